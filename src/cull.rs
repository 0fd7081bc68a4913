//! Label culling: isolated components too small to matter, and holding no
//! resources, are flood-set back to impassable.
use smallvec::SmallVec;

use crate::label::{LabelId, LabelMetadata};
use crate::quadtree::{Arena, NodeId};

/// Culls every component whose area is below `area_threshold` and which
/// holds no extractors or hydrocarbons, flood-setting `label = -1` on every
/// leaf of the component via an explicit stack (recursion risks overflow on
/// large maps, same rationale as [`crate::label::build_labels`]).
///
/// Neighbour lists are left untouched — downstream consumers filter by
/// `label >= 0` at query time, so a culled leaf's neighbours simply stop
/// being useful paths rather than being actively unlinked.
///
/// Returns the number of components culled.
pub(crate) fn cull_labels(
    arena: &mut Arena,
    labels: &mut ahash::AHashMap<LabelId, LabelMetadata>,
    area_threshold: f32,
) -> u32 {
    let to_cull: Vec<(LabelId, NodeId)> = labels
        .iter()
        .filter(|(_, metadata)| {
            metadata.area < area_threshold && metadata.num_extractors == 0 && metadata.num_hydrocarbons == 0
        })
        .map(|(id, metadata)| (*id, metadata.node))
        .collect();

    let mut stack: Vec<NodeId> = Vec::new();

    for (label_id, representative) in &to_cull {
        let label_value = *label_id as i32;

        stack.clear();
        stack.push(*representative);

        while let Some(id) = stack.pop() {
            let (matches, neighbor_ids) = {
                let leaf = arena.get(id).leaf().unwrap();
                if leaf.label != label_value {
                    (false, SmallVec::<[NodeId; 8]>::new())
                } else {
                    (true, leaf.neighbors.iter().map(|n| n.id).collect())
                }
            };
            if !matches {
                continue;
            }

            arena.get_mut(id).leaf_mut().unwrap().label = -1;

            for neighbor_id in neighbor_ids {
                if arena.get(neighbor_id).leaf().unwrap().label == label_value {
                    stack.push(neighbor_id);
                }
            }
        }

        labels.remove(label_id);
    }

    to_cull.len() as u32
}
