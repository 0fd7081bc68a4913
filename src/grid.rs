//! NavGrid: the top-level per-layer index over a layer's forest of block
//! quadtrees, and the point-to-leaf lookup consumers drive pathfinding with.
use glam::Vec3;

use crate::quadtree::{Arena, NodeId, NodeKind, QuadNode, BL, BR, TL, TR};
use crate::Layer;

/// Holds one quadtree root per block for a single [`Layer`], laid out
/// row-major `trees[z][x]`.
#[derive(Debug, Clone)]
pub struct NavGrid {
    pub layer: Layer,
    /// Side length of one block, in cells == the side of a tree's root.
    pub tree_size: i32,
    pub blocks_per_axis: i32,
    roots: Vec<NodeId>,
}

impl NavGrid {
    pub(crate) fn new(layer: Layer, tree_size: i32, blocks_per_axis: i32) -> Self {
        Self {
            layer,
            tree_size,
            blocks_per_axis,
            roots: Vec::with_capacity((blocks_per_axis * blocks_per_axis) as usize),
        }
    }

    #[inline]
    pub(crate) fn set_root(&mut self, bx: i32, bz: i32, root: NodeId) {
        let idx = (bz * self.blocks_per_axis + bx) as usize;
        debug_assert_eq!(self.roots.len(), idx, "blocks must be populated in row-major order");
        self.roots.push(root);
    }

    /// The quadtree root for block `(bx, bz)`.
    pub fn root(&self, bx: i32, bz: i32) -> NodeId {
        self.roots[(bz * self.blocks_per_axis + bx) as usize]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Finds the leaf containing world-space `(x, z)`, descending from the
    /// containing block's root. Returns `None` if `(x, z)` is outside the map
    /// (including on the `x <= 0` / `z <= 0` boundary).
    pub fn find_leaf_xz<'a>(&self, arena: &'a Arena, x: f32, z: f32) -> Option<&'a QuadNode> {
        if x <= 0.0 || z <= 0.0 {
            return None;
        }

        let bx = (x / self.tree_size as f32).floor() as i32;
        let bz = (z / self.tree_size as f32).floor() as i32;
        if bx < 0 || bz < 0 || bx >= self.blocks_per_axis || bz >= self.blocks_per_axis {
            return None;
        }

        let mut node = arena.get(self.root(bx, bz));
        loop {
            match &node.kind {
                NodeKind::Leaf(_) => return Some(node),
                NodeKind::Internal { children } => {
                    let half = node.c / 2;
                    let mid_x = (node.bx + node.ox + half) as f32;
                    let mid_z = (node.bz + node.oz + half) as f32;

                    let idx = match (x < mid_x, z < mid_z) {
                        (true, true) => TL,
                        (false, true) => TR,
                        (true, false) => BL,
                        (false, false) => BR,
                    };
                    node = arena.get(children[idx]);
                }
            }
        }
    }

    /// [`NavGrid::find_leaf_xz`] for a world-space position, reading its `x`
    /// and `z` components.
    pub fn find_leaf<'a>(&self, arena: &'a Arena, position: Vec3) -> Option<&'a QuadNode> {
        self.find_leaf_xz(arena, position.x, position.z)
    }
}
