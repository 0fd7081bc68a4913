//! Multi-layer quadtree navigation mesh generation for RTS-style game maps.
//!
//! Given a heightmap/terrain-type oracle (implement [`TerrainSampler`]), this crate compresses
//! each of five movement layers (Land, Water, Hover, Amphibious, Air) into a forest of
//! variable-resolution quadtree leaves, discovers the neighbour graph between pathable leaves,
//! labels its connected components, and culls components too small to matter. Downstream
//! consumers (pathfinding, AI economy heuristics) are expected to query the resulting
//! [`grid::NavGrid`] for the leaf containing a world position, read its label, and walk
//! `neighbors` themselves — this crate does not perform path search (see Non-goals below).
//!
//! ## Quick-start:
//! 1. Implement [`TerrainSampler`] over your heightmap/terrain-type data.
//! 2. Implement [`MarkerSource`] over your mass/hydrocarbon marker catalogue (an empty slice is
//!    fine if you don't have resource markers).
//! 3. Build a [`MeshSettings`] with [`MeshSettings::with_map_size`] and construct a
//!    [`MeshGenerator`].
//! 4. Call [`MeshGenerator::generate`]. On success every layer's [`grid::NavGrid`] is populated
//!    and queryable via [`grid::NavGrid::find_leaf`] / [`grid::NavGrid::find_leaf_xz`].
//!
//! ## Non-goals
//!
//! No A* or any other path search — that belongs to consumers walking the neighbour graph this
//! crate produces. No dynamic rebuild on terrain mutation: call [`MeshGenerator::generate`] again
//! to rebuild from scratch (it discards the previous forest, or leaves it untouched if the new
//! settings are invalid). No serialisation format: the mesh is an in-memory artefact for the
//! lifetime of the owning [`MeshGenerator`].

use ahash::AHashMap;
use tracing::debug;

#[cfg(feature = "debug_draw")]
pub mod debug_draw;
pub mod error;
pub mod grid;
pub mod label;
pub mod markers;
mod neighbors;
mod precompute;
mod raster;
pub mod quadtree;
pub mod settings;
pub mod stats;
pub mod terrain;

mod cull;

pub use error::MeshError;
pub use markers::{Marker, MarkerKind, MarkerSource};
pub use settings::MeshSettings;
pub use stats::{NavLayerData, NavLayerStats};
pub use terrain::{TerrainSampler, TerrainType};

use grid::NavGrid;
use label::{build_labels, LabelId, LabelMetadata};
use quadtree::{compress, Arena, CompressionCounts};
use raster::{build_block_rasters, BlockCaches};

/// A movement class, each with its own pathability predicate (see [`raster`]) and its own
/// independent [`grid::NavGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Land,
    Water,
    Hover,
    Amphibious,
    Air,
}

impl Layer {
    /// Every layer, in the order stats and identifier ranges are produced.
    pub const ALL: [Layer; 5] = [
        Layer::Land,
        Layer::Water,
        Layer::Hover,
        Layer::Amphibious,
        Layer::Air,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            Layer::Land => 0,
            Layer::Water => 1,
            Layer::Hover => 2,
            Layer::Amphibious => 3,
            Layer::Air => 4,
        }
    }
}

/// Owns the complete mesh for every layer: one shared node [`Arena`], one [`NavGrid`] per layer,
/// and the global label metadata table. Built once by [`MeshGenerator::generate`] and immutable
/// thereafter except for `label` fields (set to `-1` by culling) and marker resource counts.
pub struct MeshGenerator {
    settings: MeshSettings,
    arena: Arena,
    grids: Option<[NavGrid; 5]>,
    labels: AHashMap<LabelId, LabelMetadata>,
    stats: NavLayerStats,
    generated: bool,
}

impl MeshGenerator {
    /// Creates an ungenerated mesh for the given settings. Call [`MeshGenerator::generate`]
    /// before querying any layer.
    #[must_use]
    pub fn new(settings: MeshSettings) -> Self {
        Self {
            settings,
            arena: Arena::default(),
            grids: None,
            labels: AHashMap::default(),
            stats: NavLayerStats::default(),
            generated: false,
        }
    }

    #[inline]
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    #[inline]
    pub fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    /// The shared node arena backing every layer's forest.
    #[inline]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The [`NavGrid`] for `layer`. Panics if [`MeshGenerator::generate`] has not yet succeeded.
    #[inline]
    pub fn nav_grid(&self, layer: Layer) -> &NavGrid {
        &self.grids.as_ref().expect("generate() must succeed before querying nav_grid")[layer.index()]
    }

    /// Metadata for every surviving (non-culled) labelled component, keyed by component id.
    #[inline]
    pub fn nav_labels(&self) -> &AHashMap<LabelId, LabelMetadata> {
        &self.labels
    }

    /// Per-layer generation counters from the most recent successful `generate()` call.
    #[inline]
    pub fn nav_layer_data(&self) -> NavLayerStats {
        self.stats
    }

    /// Runs the full mesh construction pipeline: rasterise, compress, discover neighbours, label,
    /// precompute, bind markers, cull. Idempotent over its inputs — calling this again fully
    /// replaces the previous mesh.
    ///
    /// On `Err`, no part of the previous mesh is touched: validation happens before any new state
    /// is built or published.
    pub fn generate(
        &mut self,
        sampler: &impl TerrainSampler,
        markers: &mut impl MarkerSource,
    ) -> Result<NavLayerStats, MeshError> {
        self.settings.validate()?;

        let sampler_map_size = sampler.map_size();
        if sampler_map_size != self.settings.map_size {
            return Err(MeshError::SamplerMapSizeMismatch {
                sampler_map_size,
                settings_map_size: self.settings.map_size,
            });
        }

        #[cfg(feature = "trace")]
        let _span = tracing::info_span!("generate").entered();

        let settings = &self.settings;
        let block_size = settings.block_size();

        let mut arena = Arena::with_capacity(estimate_node_capacity(settings));
        let mut grids: [NavGrid; 5] = Layer::ALL.map(|layer| {
            NavGrid::new(layer, block_size, settings.blocks_per_axis)
        });
        let mut counts = [CompressionCounts::default(); 5];

        // Phase 1: rasterise + compress every block, for every layer, reusing one set of scratch
        // caches across the whole map.
        {
            #[cfg(feature = "trace")]
            let _span = tracing::info_span!("compress").entered();

            let mut caches = BlockCaches::new(block_size);
            for bz in 0..settings.blocks_per_axis {
                for bx in 0..settings.blocks_per_axis {
                    let block_x = bx * block_size;
                    let block_z = bz * block_size;

                    let rasters = build_block_rasters(&mut caches, sampler, settings, block_x, block_z);

                    for layer in Layer::ALL {
                        let threshold = settings.threshold_for(layer);
                        let raster = rasters.get(layer);
                        let root = compress(
                            &mut arena,
                            &mut counts[layer.index()],
                            layer,
                            raster,
                            block_x,
                            block_z,
                            0,
                            0,
                            block_size,
                            threshold,
                        );
                        grids[layer.index()].set_root(bx, bz, root);
                    }
                }
            }
        }

        // Phase 2: orthogonal neighbours, all layers, before any corner probing.
        {
            #[cfg(feature = "trace")]
            let _span = tracing::info_span!("orthogonal_neighbors").entered();
            for layer in Layer::ALL {
                neighbors::build_orthogonal_neighbors(&grids[layer.index()], &mut arena, layer);
            }
        }

        // Phase 3: corner-diagonal neighbours, all layers, after every layer's orthogonal pass.
        {
            #[cfg(feature = "trace")]
            let _span = tracing::info_span!("corner_neighbors").entered();
            for layer in Layer::ALL {
                neighbors::build_corner_neighbors(&grids[layer.index()], &mut arena, layer);
            }
        }

        // Phase 4: connected-components labelling. Ids are monotonic across every layer.
        let mut labels = AHashMap::default();
        let mut next_label: LabelId = 1;
        let mut label_counts = [0u32; 5];
        {
            #[cfg(feature = "trace")]
            let _span = tracing::info_span!("label").entered();
            for layer in Layer::ALL {
                let before = next_label;
                next_label = build_labels(&mut arena, layer, next_label, settings.area_scale, &mut labels);
                label_counts[layer.index()] = next_label - before;
            }
        }

        // Phase 5: leaf centres, then neighbour distances/directions derived from them.
        {
            #[cfg(feature = "trace")]
            let _span = tracing::info_span!("precompute").entered();
            for layer in Layer::ALL {
                precompute::precompute_centres(&mut arena, layer);
            }
            for layer in Layer::ALL {
                precompute::precompute_edges(&mut arena, layer);
            }
        }

        // Phase 6: bind resource markers to labels, on Land and Amphibious only, before culling
        // so culling can see which components hold resources.
        {
            #[cfg(feature = "trace")]
            let _span = tracing::info_span!("bind_markers").entered();
            let land_grid = &grids[Layer::Land.index()];
            let amphibious_grid = &grids[Layer::Amphibious.index()];

            markers::bind_markers(
                MarkerKind::Mass,
                markers.markers_mut(MarkerKind::Mass),
                &arena,
                land_grid,
                amphibious_grid,
                &mut labels,
            );
            markers::bind_markers(
                MarkerKind::Hydrocarbon,
                markers.markers_mut(MarkerKind::Hydrocarbon),
                &arena,
                land_grid,
                amphibious_grid,
                &mut labels,
            );
        }

        // Phase 7: cull isolated, resourceless, sub-threshold components.
        let culled = {
            #[cfg(feature = "trace")]
            let _span = tracing::info_span!("cull").entered();
            cull::cull_labels(&mut arena, &mut labels, settings.culling_area_threshold)
        };

        let mut stats = NavLayerStats {
            culled_labels: culled,
            ..Default::default()
        };
        for layer in Layer::ALL {
            let neighbors_count: u32 = arena
                .iter()
                .filter(|n| n.layer == layer)
                .filter_map(|n| n.leaf())
                .map(|leaf| leaf.neighbors.len() as u32)
                .sum();

            *stats.get_mut(layer) = NavLayerData {
                pathable_leafs: counts[layer.index()].pathable_leaves,
                unpathable_leafs: counts[layer.index()].unpathable_leaves,
                subdivisions: counts[layer.index()].subdivisions,
                neighbors: neighbors_count,
                labels: label_counts[layer.index()],
            };
        }

        debug!(?stats, "nav mesh generated");
        if culled > 0 {
            debug!(culled, "culled isolated resourceless components");
        }

        self.arena = arena;
        self.grids = Some(grids);
        self.labels = labels;
        self.stats = stats;
        self.generated = true;

        Ok(stats)
    }
}

/// Ballpark number of nodes to pre-reserve the arena for, so the first few blocks of a large map
/// don't force repeated reallocation. Deliberately coarse — correctness doesn't depend on it.
fn estimate_node_capacity(settings: &MeshSettings) -> usize {
    let blocks = (settings.blocks_per_axis * settings.blocks_per_axis) as usize;
    let block_size = settings.block_size() as usize;
    let threshold = settings.compression_threshold.max(1) as usize;
    let leaves_per_block = (block_size / threshold).pow(2).max(1);
    // five layers, leaves plus a generous guess at internal nodes.
    blocks * leaves_per_block * 5 * 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::Marker;
    use glam::Vec3;

    struct FlatSampler {
        size: i32,
    }

    impl TerrainSampler for FlatSampler {
        fn terrain_height(&self, _x: i32, _z: i32) -> f32 {
            0.0
        }
        fn surface_height(&self, _x: i32, _z: i32) -> f32 {
            0.0
        }
        fn terrain_type(&self, _x: i32, _z: i32) -> TerrainType {
            TerrainType { blocking: false }
        }
        fn map_size(&self) -> i32 {
            self.size
        }
    }

    struct NoMarkers;
    impl MarkerSource for NoMarkers {
        fn markers_mut(&mut self, _kind: MarkerKind) -> &mut [Marker] {
            &mut []
        }
    }

    #[test]
    fn flat_map_collapses_to_single_leaf_blocks() {
        let settings = MeshSettings::with_map_size(64).with_blocks_per_axis(16);
        let mut mesh = MeshGenerator::new(settings);
        let sampler = FlatSampler { size: 64 };
        let stats = mesh.generate(&sampler, &mut NoMarkers).unwrap();

        assert_eq!(stats.land.pathable_leafs, 256);
        assert_eq!(stats.land.unpathable_leafs, 0);
        assert_eq!(stats.land.subdivisions, 0);
        assert_eq!(stats.water.pathable_leafs, 0);
        assert!(mesh.is_generated());

        let land = mesh.nav_labels();
        let land_labels: Vec<_> = land
            .values()
            .filter(|m| m.layer == Layer::Land)
            .collect();
        assert_eq!(land_labels.len(), 1);
        // 256 leaves, each a whole 4x4 block: area = 256 * (4 * area_scale)^2.
        assert!((land_labels[0].area - 256.0 * 0.04 * 0.04).abs() < 1e-6);
    }

    #[test]
    fn invalid_settings_reject_without_touching_previous_mesh() {
        let mut mesh = MeshGenerator::new(MeshSettings::with_map_size(64).with_blocks_per_axis(16));
        let sampler = FlatSampler { size: 64 };
        mesh.generate(&sampler, &mut NoMarkers).unwrap();
        assert!(mesh.is_generated());

        let bad_settings = MeshSettings::with_map_size(100).with_blocks_per_axis(16);
        mesh.settings = bad_settings;
        let result = mesh.generate(&sampler, &mut NoMarkers);
        assert!(result.is_err());
        // Previous mesh is still intact.
        assert!(mesh.is_generated());
        assert_eq!(mesh.nav_layer_data().land.pathable_leafs, 256);
    }

    #[test]
    fn find_leaf_round_trips_a_world_position() {
        let settings = MeshSettings::with_map_size(64).with_blocks_per_axis(16);
        let mut mesh = MeshGenerator::new(settings);
        let sampler = FlatSampler { size: 64 };
        mesh.generate(&sampler, &mut NoMarkers).unwrap();

        let grid = mesh.nav_grid(Layer::Land);
        let leaf = grid
            .find_leaf(mesh.arena(), Vec3::new(10.5, 0.0, 10.5))
            .expect("leaf must exist for an in-bounds point");
        assert!(leaf.leaf().unwrap().is_pathable());
    }
}
