//! UI-facing generation statistics, one snapshot emitted per `generate()`.
use crate::Layer;

/// Per-layer counters emitted by the driver once generation completes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NavLayerData {
    pub pathable_leafs: u32,
    pub unpathable_leafs: u32,
    pub subdivisions: u32,
    pub neighbors: u32,
    pub labels: u32,
}

/// Stats for all five layers from a single [`crate::MeshGenerator::generate`]
/// call, plus the number of components culled across all layers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NavLayerStats {
    pub land: NavLayerData,
    pub water: NavLayerData,
    pub hover: NavLayerData,
    pub amphibious: NavLayerData,
    pub air: NavLayerData,
    pub culled_labels: u32,
}

impl NavLayerStats {
    pub fn get(&self, layer: Layer) -> NavLayerData {
        match layer {
            Layer::Land => self.land,
            Layer::Water => self.water,
            Layer::Hover => self.hover,
            Layer::Amphibious => self.amphibious,
            Layer::Air => self.air,
        }
    }

    pub(crate) fn get_mut(&mut self, layer: Layer) -> &mut NavLayerData {
        match layer {
            Layer::Land => &mut self.land,
            Layer::Water => &mut self.water,
            Layer::Hover => &mut self.hover,
            Layer::Amphibious => &mut self.amphibious,
            Layer::Air => &mut self.air,
        }
    }
}
