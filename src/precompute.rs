//! Leaf centre and neighbour edge precomputation: two sweeps over a layer's
//! leaves, run once labelling has settled so centres exist before distances
//! are derived from them.
use glam::Vec2;

use crate::quadtree::{Arena, NodeId};
use crate::Layer;

/// Sweep 1: sets `px`/`pz` (here: `centre`) on every pathable leaf of
/// `layer`.
pub(crate) fn precompute_centres(arena: &mut Arena, layer: Layer) {
    let leaf_ids: Vec<NodeId> = arena
        .iter()
        .filter(|n| n.layer == layer && n.leaf().is_some_and(|l| l.is_pathable()))
        .map(|n| n.id)
        .collect();

    for id in leaf_ids {
        let node = arena.get(id);
        let half = node.c as f32 * 0.5;
        let centre = Vec2::new((node.bx + node.ox) as f32 + half, (node.bz + node.oz) as f32 + half);
        arena.get_mut(id).leaf_mut().unwrap().centre = Some(centre);
    }
}

/// Sweep 2: for every `(self, neighbor)` pair, sets `distance` and
/// `direction` (an un-normalised displacement, not a unit vector — consumers
/// use it directly as a step).
pub(crate) fn precompute_edges(arena: &mut Arena, layer: Layer) {
    let leaf_ids: Vec<NodeId> = arena
        .iter()
        .filter(|n| n.layer == layer && n.leaf().is_some_and(|l| l.is_pathable()))
        .map(|n| n.id)
        .collect();

    for id in leaf_ids {
        let (self_centre, neighbor_ids): (Vec2, Vec<NodeId>) = {
            let leaf = arena.get(id).leaf().unwrap();
            (
                leaf.centre.expect("centres must be precomputed first"),
                leaf.neighbors.iter().map(|n| n.id).collect(),
            )
        };

        for neighbor_id in neighbor_ids {
            let neighbor_centre = arena
                .get(neighbor_id)
                .leaf()
                .unwrap()
                .centre
                .expect("centres must be precomputed first");

            let direction = neighbor_centre - self_centre;
            let distance = direction.length();

            let leaf = arena.get_mut(id).leaf_mut().unwrap();
            if let Some(edge) = leaf.neighbors.iter_mut().find(|n| n.id == neighbor_id) {
                edge.direction = direction;
                edge.distance = distance;
            }
        }
    }
}
