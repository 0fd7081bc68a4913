//! Tunable constants for mesh generation.
use crate::error::MeshError;

/// Settings for nav-mesh generation.
///
/// Every tunable external contract constant lives here so a single struct
/// fully determines the mesh produced from a given heightmap. Use
/// [`MeshSettings::with_map_size`] for sane defaults and the `with_*` setters
/// to override individual values.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSettings {
    /// Side length of the map in cells. Must be a positive multiple of
    /// [`MeshSettings::blocks_per_axis`].
    pub map_size: i32,
    /// Number of blocks along one axis of the map. Each block is the root of
    /// one quadtree per layer.
    ///
    /// **Suggested value**: 16.
    pub blocks_per_axis: i32,

    /// Maximum height difference between two adjacent corners that is still
    /// considered horizontally/vertically walkable, in world units.
    ///
    /// **Suggested value**: 0.75.
    pub max_height_diff: f32,
    /// Minimum average water depth for a cell to be naval-pathable (Water
    /// layer), in world units.
    ///
    /// **Suggested value**: 1.5.
    pub min_water_depth_naval: f32,
    /// Maximum average water depth for a cell to still be amphibious-pathable,
    /// in world units.
    ///
    /// **Suggested value**: 25.0.
    pub max_water_depth_amphibious: f32,

    /// Component area (see [`crate::label::LabelMetadata::area`]) below which
    /// an isolated component with no bound resources is culled.
    ///
    /// **Suggested value**: 0.2.
    pub culling_area_threshold: f32,
    /// Scale applied to a leaf's side length before squaring it into area
    /// units. `area = (area_scale * c)^2`.
    ///
    /// **Suggested value**: 0.01.
    pub area_scale: f32,

    /// Compression threshold for Land/Hover/Amphibious/Air layers, in cells.
    /// Must divide `map_size / blocks_per_axis`. The Water layer always uses
    /// twice this value.
    ///
    /// **Suggested value**: 2 for maps <= 1024, 4 for larger maps. See
    /// [`MeshSettings::with_map_size`].
    pub compression_threshold: i32,
}

impl MeshSettings {
    /// Creates settings for a map of the given side length (in cells), with
    /// every other tunable set to its documented default, including the
    /// size-dependent compression threshold.
    #[must_use]
    pub fn with_map_size(map_size: i32) -> Self {
        Self {
            map_size,
            blocks_per_axis: 16,
            max_height_diff: 0.75,
            min_water_depth_naval: 1.5,
            max_water_depth_amphibious: 25.0,
            culling_area_threshold: 0.2,
            area_scale: 0.01,
            compression_threshold: if map_size <= 1024 { 2 } else { 4 },
        }
    }

    /// Setter for [`MeshSettings::blocks_per_axis`].
    #[must_use]
    pub fn with_blocks_per_axis(mut self, blocks_per_axis: i32) -> Self {
        self.blocks_per_axis = blocks_per_axis;
        self
    }
    /// Setter for [`MeshSettings::max_height_diff`].
    #[must_use]
    pub fn with_max_height_diff(mut self, max_height_diff: f32) -> Self {
        self.max_height_diff = max_height_diff;
        self
    }
    /// Setter for [`MeshSettings::min_water_depth_naval`] and
    /// [`MeshSettings::max_water_depth_amphibious`].
    #[must_use]
    pub fn with_water_depth_bounds(mut self, naval_min: f32, amphibious_max: f32) -> Self {
        self.min_water_depth_naval = naval_min;
        self.max_water_depth_amphibious = amphibious_max;
        self
    }
    /// Setter for [`MeshSettings::culling_area_threshold`].
    #[must_use]
    pub fn with_culling_area_threshold(mut self, culling_area_threshold: f32) -> Self {
        self.culling_area_threshold = culling_area_threshold;
        self
    }
    /// Setter for [`MeshSettings::compression_threshold`].
    #[must_use]
    pub fn with_compression_threshold(mut self, compression_threshold: i32) -> Self {
        self.compression_threshold = compression_threshold;
        self
    }

    /// Side length of one block in cells.
    #[inline]
    pub fn block_size(&self) -> i32 {
        self.map_size / self.blocks_per_axis
    }

    /// Compression threshold to use for the given layer; Water uses double
    /// the base threshold.
    #[inline]
    pub(crate) fn threshold_for(&self, layer: crate::Layer) -> i32 {
        match layer {
            crate::Layer::Water => self.compression_threshold * 2,
            _ => self.compression_threshold,
        }
    }

    /// Validates the cross-field invariants that make a mesh buildable at
    /// all: `map_size` must be a positive multiple of `blocks_per_axis`, and
    /// every layer's compression threshold must divide the block size.
    pub(crate) fn validate(&self) -> Result<(), MeshError> {
        if self.map_size <= 0
            || self.blocks_per_axis <= 0
            || self.map_size % self.blocks_per_axis != 0
        {
            return Err(MeshError::MapSizeNotMultipleOfBlocksPerAxis {
                map_size: self.map_size,
                blocks_per_axis: self.blocks_per_axis,
            });
        }

        let block_size = self.block_size();
        for layer in crate::Layer::ALL {
            let threshold = self.threshold_for(layer);
            if threshold <= 0 || block_size % threshold != 0 {
                return Err(MeshError::ThresholdDoesNotDivideBlockSize {
                    threshold,
                    block_size,
                });
            }
        }

        Ok(())
    }
}
