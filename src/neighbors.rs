//! Neighbour discovery: orthogonal edge probing (phase 1) and corner-cut
//! diagonal probing (phase 2). Both phases run over every pathable leaf of a
//! layer; phase 2 must run after phase 1 has completed for every leaf of that
//! layer, since the corner-cut test probes the same stable forest phase 1
//! depends on having settled.
use glam::Vec2;
use smallvec::SmallVec;

use crate::quadtree::{Arena, Neighbor, NodeId};
use crate::{grid::NavGrid, Layer};

struct LeafRect {
    id: NodeId,
    label: i32,
    x1: f32,
    z1: f32,
    x2: f32,
    z2: f32,
}

fn pathable_leaf_rects(arena: &Arena, layer: Layer) -> Vec<LeafRect> {
    arena
        .iter()
        .filter(|node| node.layer == layer)
        .filter_map(|node| {
            let leaf = node.leaf()?;
            if !leaf.is_pathable() {
                return None;
            }
            let (min, max) = node.bounds();
            Some(LeafRect {
                id: node.id,
                label: leaf.label,
                x1: min.x,
                z1: min.y,
                x2: max.x,
                z2: max.y,
            })
        })
        .collect()
}

fn push_neighbor_once(arena: &mut Arena, from: NodeId, to: NodeId) {
    let leaf = arena
        .get_mut(from)
        .leaf_mut()
        .expect("push_neighbor_once called on non-leaf");
    if leaf.neighbors.iter().any(|n| n.id == to) {
        return;
    }
    leaf.neighbors.push(Neighbor {
        id: to,
        distance: 0.0,
        direction: Vec2::ZERO,
    });
}

/// Scans along one edge, starting at `(pos, fixed)` (or `(fixed, pos)` if
/// `!horizontal`) and stepping by each probe's own side length, up to `end`.
/// Every pathable probe found is recorded; scanning stops the instant a probe
/// returns `None` (off-map).
fn scan_edge(
    grid: &NavGrid,
    arena: &Arena,
    mut pos: f32,
    end: f32,
    fixed: f32,
    horizontal: bool,
    out: &mut SmallVec<[NodeId; 8]>,
) {
    while pos < end {
        let probe = if horizontal {
            grid.find_leaf_xz(arena, pos, fixed)
        } else {
            grid.find_leaf_xz(arena, fixed, pos)
        };
        let Some(probe) = probe else {
            break;
        };

        if let Some(leaf) = probe.leaf() {
            if leaf.is_pathable() {
                out.push(probe.id);
            }
            pos += probe.c as f32;
        } else {
            // Internal nodes are never returned by find_leaf_xz.
            unreachable!("find_leaf_xz returned an internal node");
        }
    }
}

/// Phase 1: for every pathable leaf of `layer`, probes just outside each of
/// its four edges and records every pathable leaf found as a neighbour.
pub(crate) fn build_orthogonal_neighbors(grid: &NavGrid, arena: &mut Arena, layer: Layer) {
    let leaves = pathable_leaf_rects(arena, layer);

    for rect in &leaves {
        let mut found = SmallVec::<[NodeId; 8]>::new();

        // Top edge.
        scan_edge(grid, arena, rect.x1 + 0.5, rect.x2, rect.z1 - 0.5, true, &mut found);
        // Bottom edge.
        scan_edge(grid, arena, rect.x1 + 0.5, rect.x2, rect.z2 + 0.5, true, &mut found);
        // Left edge.
        scan_edge(grid, arena, rect.z1 + 0.5, rect.z2, rect.x1 - 0.5, false, &mut found);
        // Right edge.
        scan_edge(grid, arena, rect.z1 + 0.5, rect.z2, rect.x2 + 0.5, false, &mut found);

        for neighbor_id in found {
            push_neighbor_once(arena, rect.id, neighbor_id);
        }
    }
}

/// Phase 2: for every pathable leaf of `layer`, probes each of its four
/// corners. A diagonal neighbour is only linked if it is itself pathable and
/// both orthogonal cells sharing that corner exist and carry the same label
/// value as `self` (at this point in the pipeline that means "both pathable",
/// since every pathable leaf still carries `label == 0`; see the open
/// question on corner-rule timing). This refuses diagonal cuts through an
/// impassable wedge without requiring labels to exist yet.
pub(crate) fn build_corner_neighbors(grid: &NavGrid, arena: &mut Arena, layer: Layer) {
    let leaves = pathable_leaf_rects(arena, layer);

    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];

    for rect in &leaves {
        let mut linked = SmallVec::<[NodeId; 4]>::new();

        for &(sign_x, sign_z) in &CORNERS {
            let corner_x = if sign_x < 0.0 { rect.x1 - 0.5 } else { rect.x2 + 0.5 };
            let corner_z = if sign_z < 0.0 { rect.z1 - 0.5 } else { rect.z2 + 0.5 };
            let near_x = if sign_x < 0.0 { rect.x1 + 0.5 } else { rect.x2 - 0.5 };
            let near_z = if sign_z < 0.0 { rect.z1 + 0.5 } else { rect.z2 - 0.5 };

            let Some(diagonal) = grid.find_leaf_xz(arena, corner_x, corner_z) else {
                continue;
            };
            let Some(diagonal_leaf) = diagonal.leaf() else {
                continue;
            };
            if !diagonal_leaf.is_pathable() {
                continue;
            }

            let horizontal_ok = grid
                .find_leaf_xz(arena, near_x, corner_z)
                .and_then(|n| n.leaf())
                .is_some_and(|l| l.label == rect.label);
            let vertical_ok = grid
                .find_leaf_xz(arena, corner_x, near_z)
                .and_then(|n| n.leaf())
                .is_some_and(|l| l.label == rect.label);

            if horizontal_ok && vertical_ok {
                linked.push(diagonal.id);
            }
        }

        for neighbor_id in linked {
            push_neighbor_once(arena, rect.id, neighbor_id);
        }
    }
}
