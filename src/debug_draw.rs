//! Debug drawing for the generated mesh, gated behind the `debug_draw` feature.
//!
//! This crate owns no renderer: a host draws by implementing [`DebugDrawSink`] over whatever
//! gizmo/line-drawing API it has, rather than this crate bundling its own.
use glam::Vec3;

use crate::quadtree::{Arena, NodeId};
use crate::{Layer, MeshGenerator};

/// An RGBA colour in `[0, 1]` per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Host-provided line drawing primitive. A leaf is drawn as its four boundary edges; a world-up
/// tick is not drawn here since the mesh is 2D — hosts that want a height should sample their own
/// terrain at the returned XZ.
pub trait DebugDrawSink {
    fn draw_line(&mut self, a: Vec3, b: Vec3, color: Color);
}

/// Direct per-layer colour mapping for leaf outlines.
#[must_use]
pub fn layer_color(layer: Layer) -> Color {
    match layer {
        Layer::Land => Color::rgb(0.2, 0.7, 0.2),
        Layer::Water => Color::rgb(0.2, 0.4, 0.9),
        Layer::Hover => Color::rgb(0.8, 0.7, 0.2),
        Layer::Amphibious => Color::rgb(0.6, 0.3, 0.8),
        Layer::Air => Color::rgb(0.9, 0.9, 0.9),
    }
}

/// Deterministic hash-based colour for a label id, so neighbouring components are visually
/// distinguishable without maintaining an explicit palette.
#[must_use]
pub fn label_color(label_id: u32) -> Color {
    // Fibonacci hashing: a cheap, well-distributed spread across the unit interval per channel.
    let h = label_id.wrapping_mul(2_654_435_761);
    let r = ((h >> 16) & 0xff) as f32 / 255.0;
    let g = ((h >> 8) & 0xff) as f32 / 255.0;
    let b = (h & 0xff) as f32 / 255.0;
    Color::rgb(r, g, b)
}

/// Draws the outline of every leaf of `layer`, coloured by [`layer_color`].
pub fn draw_layer(mesh: &MeshGenerator, layer: Layer, sink: &mut impl DebugDrawSink) {
    let color = layer_color(layer);
    let arena = mesh.arena();
    for node in arena.iter().filter(|n| n.layer == layer && n.is_leaf()) {
        draw_leaf_outline(arena, node.id, color, sink);
    }
}

/// Draws the outline of every pathable leaf of `layer`, coloured by the [`label_color`] of its
/// component. Unlabelled/impassable leaves are skipped.
pub fn draw_labels(mesh: &MeshGenerator, layer: Layer, sink: &mut impl DebugDrawSink) {
    let arena = mesh.arena();
    for node in arena.iter().filter(|n| n.layer == layer) {
        let Some(leaf) = node.leaf() else { continue };
        let Some(label_id) = leaf.label_id() else {
            continue;
        };
        draw_leaf_outline(arena, node.id, label_color(label_id), sink);
    }
}

fn draw_leaf_outline(arena: &Arena, id: NodeId, color: Color, sink: &mut impl DebugDrawSink) {
    let node = arena.get(id);
    let (min, max) = node.bounds();

    let corners = [
        Vec3::new(min.x, 0.0, min.y),
        Vec3::new(max.x, 0.0, min.y),
        Vec3::new(max.x, 0.0, max.y),
        Vec3::new(min.x, 0.0, max.y),
    ];
    for i in 0..4 {
        sink.draw_line(corners[i], corners[(i + 1) % 4], color);
    }
}
