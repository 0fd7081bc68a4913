//! The quadtree arena: nodes for every layer live in one flat [`Arena`], and
//! cross-references (parent/child, and later neighbours) are arena indices
//! rather than owned pointers, so the neighbour graph can be cyclic without
//! being an ownership cycle.
use glam::Vec2;
use smallvec::SmallVec;

use crate::{label::LabelId, raster::Raster, Layer};

/// Index into a mesh's node [`Arena`]. Doubles as the node's identifier: it
/// is assigned once, monotonically, and is unique across every tree of every
/// layer because all layers share one arena.
pub type NodeId = u32;

/// Quadrant order used throughout: top-left, top-right, bottom-left,
/// bottom-right (low-x/low-z first, then moving across, then down).
pub(crate) const CHILD_COUNT: usize = 4;
pub(crate) const TL: usize = 0;
pub(crate) const TR: usize = 1;
pub(crate) const BL: usize = 2;
pub(crate) const BR: usize = 3;

/// One neighbour edge of a pathable leaf. Distance and direction are filled
/// in later by [`crate::precompute`]; they read `0.0`/`ZERO` until then.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: NodeId,
    pub distance: f32,
    pub direction: Vec2,
}

/// Leaf-only data. Absent on internal nodes, enforcing statically that an
/// internal node can never carry a label or a neighbour list.
#[derive(Debug, Clone)]
pub struct LeafData {
    /// `-1` impassable, `0` pathable-but-unlabelled, `>0` a component id.
    pub label: i32,
    /// Populated only for pathable leaves (`label >= 0`), by the neighbour
    /// builder.
    pub neighbors: SmallVec<[Neighbor; 8]>,
    /// Leaf centre in world units. `None` until [`crate::precompute`] runs,
    /// and always `None` for impassable leaves.
    pub centre: Option<Vec2>,
}

impl LeafData {
    fn new(label: i32) -> Self {
        Self {
            label,
            neighbors: SmallVec::new(),
            centre: None,
        }
    }

    #[inline]
    pub fn is_pathable(&self) -> bool {
        self.label >= 0
    }

    #[inline]
    pub fn label_id(&self) -> Option<LabelId> {
        (self.label > 0).then_some(self.label as LabelId)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Internal { children: [NodeId; CHILD_COUNT] },
    Leaf(LeafData),
}

/// A node of a quadtree: either an internal node with four children in
/// `{TL, TR, BL, BR}` order, or a leaf. See [`NodeKind`].
#[derive(Debug, Clone)]
pub struct QuadNode {
    pub id: NodeId,
    pub layer: Layer,
    /// Top-left corner of the enclosing block, in world units.
    pub bx: i32,
    pub bz: i32,
    /// Offset of this node's top-left within the block, in cells.
    pub ox: i32,
    pub oz: i32,
    /// Side length of this node, in cells (== world units).
    pub c: i32,
    pub(crate) kind: NodeKind,
}

impl QuadNode {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    #[inline]
    pub fn leaf(&self) -> Option<&LeafData> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Internal { .. } => None,
        }
    }

    #[inline]
    pub fn leaf_mut(&mut self) -> Option<&mut LeafData> {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Internal { .. } => None,
        }
    }

    /// World-space rectangle `(min, max)` this node covers.
    #[inline]
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let min = Vec2::new((self.bx + self.ox) as f32, (self.bz + self.oz) as f32);
        let max = min + Vec2::splat(self.c as f32);
        (min, max)
    }
}

/// Flat storage for every [`QuadNode`] of every layer. Node identifiers are
/// simply indices into this vec.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<QuadNode>,
}

impl Arena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(
        &mut self,
        layer: Layer,
        bx: i32,
        bz: i32,
        ox: i32,
        oz: i32,
        c: i32,
        kind: NodeKind,
    ) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(QuadNode {
            id,
            layer,
            bx,
            bz,
            ox,
            oz,
            c,
            kind,
        });
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &QuadNode {
        &self.nodes[id as usize]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut QuadNode {
        &mut self.nodes[id as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuadNode> {
        self.nodes.iter()
    }
}

/// Per-layer counters accumulated while compressing a block, rolled up into
/// the driver's `NavLayerData` snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CompressionCounts {
    pub pathable_leaves: u32,
    pub unpathable_leaves: u32,
    pub subdivisions: u32,
}

/// Recursively compresses a block's pathability raster into a quadtree,
/// pushing every node (internal and leaf) into `arena` and returning the
/// root's id.
///
/// `ox`/`oz` are block-local cell offsets, `c` is the node's side in cells.
/// Recursion depth is bounded by `log2(block_size / threshold)`, a handful of
/// levels even for large maps, unlike the labelling/culling traversals which
/// must be iterative to avoid overflowing the call stack on large maps.
#[allow(clippy::too_many_arguments)]
pub(crate) fn compress(
    arena: &mut Arena,
    counts: &mut CompressionCounts,
    layer: Layer,
    raster: &Raster,
    bx: i32,
    bz: i32,
    ox: i32,
    oz: i32,
    c: i32,
    threshold: i32,
) -> NodeId {
    let value = raster.get(ox, oz);
    let uniform = raster.is_uniform(ox, oz, c, value);

    if c <= threshold {
        let label = if uniform { value } else { -1 };
        return push_leaf(arena, counts, layer, bx, bz, ox, oz, c, label);
    }

    if uniform {
        return push_leaf(arena, counts, layer, bx, bz, ox, oz, c, value);
    }

    counts.subdivisions += 1;
    let half = c / 2;
    let children = [
        compress(arena, counts, layer, raster, bx, bz, ox, oz, half, threshold),
        compress(arena, counts, layer, raster, bx, bz, ox + half, oz, half, threshold),
        compress(arena, counts, layer, raster, bx, bz, ox, oz + half, half, threshold),
        compress(
            arena, counts, layer, raster, bx, bz, ox + half, oz + half, half, threshold,
        ),
    ];

    arena.push(layer, bx, bz, ox, oz, c, NodeKind::Internal { children })
}

#[allow(clippy::too_many_arguments)]
fn push_leaf(
    arena: &mut Arena,
    counts: &mut CompressionCounts,
    layer: Layer,
    bx: i32,
    bz: i32,
    ox: i32,
    oz: i32,
    c: i32,
    label: i32,
) -> NodeId {
    if label >= 0 {
        counts.pathable_leaves += 1;
    } else {
        counts.unpathable_leaves += 1;
    }
    arena.push(layer, bx, bz, ox, oz, c, NodeKind::Leaf(LeafData::new(label)))
}
