//! Connected-components labelling: iterative DFS over the neighbour graph,
//! assigning globally monotonic component ids and accumulating per-component
//! area.
use glam::Vec3;
use smallvec::SmallVec;
use tracing::warn;

use crate::quadtree::{Arena, NodeId};
use crate::Layer;

/// A connected-component id, `> 0`. Monotonic across every layer of a single
/// [`crate::MeshGenerator::generate`] call.
pub type LabelId = u32;

/// Metadata for one labelled component.
#[derive(Debug, Clone)]
pub struct LabelMetadata {
    /// One representative leaf of the component.
    pub node: NodeId,
    pub layer: Layer,
    /// `Sum((area_scale * c)^2)` over every leaf in the component.
    pub area: f32,
    /// Mass extractor count. Also incremented for hydrocarbon markers,
    /// preserving the source's latent behaviour — see [`crate::markers`].
    pub num_extractors: u32,
    /// True hydrocarbon-only count, exposed separately so callers can decide
    /// whether the extractor double-count above was intentional.
    pub num_hydrocarbons: u32,
    pub extractor_markers: Vec<Vec3>,
    pub hydrocarbon_markers: Vec<Vec3>,
}

impl LabelMetadata {
    fn new(node: NodeId, layer: Layer) -> Self {
        Self {
            node,
            layer,
            area: 0.0,
            num_extractors: 0,
            num_hydrocarbons: 0,
            extractor_markers: Vec::new(),
            hydrocarbon_markers: Vec::new(),
        }
    }
}

/// Labels every pathable leaf of `layer` reachable from any other via
/// `neighbors*` with the same component id, starting ids at `next_label`.
/// Returns the next free label id.
///
/// Uses an explicit stack rather than recursion: recursive labelling can
/// exceed the host call stack on large maps, the same reason region-growing
/// over a large cell graph is written iteratively rather than recursively.
pub(crate) fn build_labels(
    arena: &mut Arena,
    layer: Layer,
    next_label: LabelId,
    area_scale: f32,
    labels: &mut ahash::AHashMap<LabelId, LabelMetadata>,
) -> LabelId {
    let leaf_ids: Vec<NodeId> = arena
        .iter()
        .filter(|n| n.layer == layer && n.leaf().is_some_and(|l| l.is_pathable()))
        .map(|n| n.id)
        .collect();

    let mut next_label = next_label;
    let mut stack: Vec<NodeId> = Vec::new();

    for seed in leaf_ids {
        if arena.get(seed).leaf().unwrap().label != 0 {
            continue;
        }

        let label = next_label;
        next_label += 1;
        labels.insert(label, LabelMetadata::new(seed, layer));

        stack.clear();
        stack.push(seed);

        while let Some(id) = stack.pop() {
            let (current_label, c) = {
                let node = arena.get(id);
                let leaf = node.leaf().expect("labelling stack must only hold leaves");
                (leaf.label, node.c)
            };

            if current_label == label as i32 {
                // Already claimed by this component via another path.
                continue;
            }
            if current_label > 0 {
                warn!(
                    leaf = id,
                    existing = current_label,
                    attempted = label,
                    "leaf already carries a different positive label during labelling; neighbour symmetry may be broken"
                );
                continue;
            }

            arena.get_mut(id).leaf_mut().unwrap().label = label as i32;

            let metadata = labels.get_mut(&label).expect("just inserted");
            metadata.area += (area_scale * c as f32).powi(2);

            let neighbor_ids: SmallVec<[NodeId; 8]> = arena
                .get(id)
                .leaf()
                .unwrap()
                .neighbors
                .iter()
                .map(|n| n.id)
                .collect();

            for neighbor_id in neighbor_ids {
                if arena.get(neighbor_id).leaf().unwrap().label == 0 {
                    stack.push(neighbor_id);
                }
            }
        }
    }

    next_label
}
