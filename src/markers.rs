//! Resource markers (mass/hydrocarbon extractor spots) and the binder that
//! attaches them to the labelled component they sit on.
use glam::Vec3;
use tracing::trace;

use crate::{grid::NavGrid, label::LabelId, quadtree::Arena, Layer};

/// Which marker catalogue to pull from [`MarkerSource::markers_mut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Mass,
    Hydrocarbon,
}

/// A resource marker placed by the scenario loader.
///
/// `label`/`layer` start as `None` and are filled in by the binder for the
/// first layer (of `{Land, Amphibious}`) on which the marker resolves to a
/// pathable leaf. A marker whose position falls outside the map or on an
/// impassable leaf keeps `label = None`; no error is raised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Vec3,
    pub label: Option<LabelId>,
    pub layer: Option<Layer>,
}

impl Marker {
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            label: None,
            layer: None,
        }
    }
}

/// The marker catalogue external collaborator: the scenario's mass and
/// hydrocarbon positions, out of scope for this crate to own or load.
pub trait MarkerSource {
    /// Returns every marker of the given kind, for in-place binding.
    fn markers_mut(&mut self, kind: MarkerKind) -> &mut [Marker];
}

/// Binds every marker of the given kind to the label of the leaf it sits on,
/// for each of `{Land, Amphibious}`, incrementing that component's resource
/// count.
///
/// Must run after labelling and before culling, so that culling can see which
/// components hold resources.
///
/// Note (open question, kept from the source): hydrocarbon markers increment
/// `num_extractors`, not a separate hydrocarbon-only tally, mirroring the
/// original's latent behaviour. Both counts are exposed separately on
/// [`crate::label::LabelMetadata`] so callers can decide whether this was
/// intentional.
pub(crate) fn bind_markers(
    kind: MarkerKind,
    markers: &mut [Marker],
    arena: &Arena,
    land_grid: &NavGrid,
    amphibious_grid: &NavGrid,
    labels: &mut ahash::AHashMap<LabelId, crate::label::LabelMetadata>,
) {
    for marker in markers.iter_mut() {
        for (layer, grid) in [(Layer::Land, land_grid), (Layer::Amphibious, amphibious_grid)] {
            let Some(leaf) = grid.find_leaf_xz(arena, marker.position.x, marker.position.z) else {
                trace!(x = marker.position.x, z = marker.position.z, ?layer, "marker outside map or on impassable leaf");
                continue;
            };
            let Some(label_id) = leaf.leaf().and_then(|l| l.label_id()) else {
                continue;
            };

            let Some(metadata) = labels.get_mut(&label_id) else {
                continue;
            };

            match kind {
                MarkerKind::Mass => {
                    metadata.num_extractors += 1;
                    metadata.extractor_markers.push(marker.position);
                }
                MarkerKind::Hydrocarbon => {
                    // Kept from the source: hydrocarbons are tallied as
                    // extractors, not as a distinct hydrocarbon count.
                    metadata.num_extractors += 1;
                    metadata.extractor_markers.push(marker.position);
                    metadata.num_hydrocarbons += 1;
                    metadata.hydrocarbon_markers.push(marker.position);
                }
            }

            if marker.label.is_none() {
                marker.label = Some(label_id);
                marker.layer = Some(layer);
            }
        }
    }
}
