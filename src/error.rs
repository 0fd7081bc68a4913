//! Error surface for mesh generation.
//!
//! Only fatal, map-wide misconfiguration becomes a [`MeshError`] variant
//! returned from [`crate::MeshGenerator::generate`]. Per-sample problems
//! (oracle faults, internal relabelling conflicts, markers that land outside
//! the mesh) are not errors: a single bad sample must never abort a whole-map
//! build, so those are reported through `tracing` events at the point of
//! detection instead. Queries that find nothing return `Option`, not
//! `Result`, for the same reason.

use thiserror::Error;

/// Fatal conditions that abort [`crate::MeshGenerator::generate`] before any
/// mesh state is touched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    /// `map_size` must be a positive multiple of `blocks_per_axis`.
    #[error(
        "map size {map_size} is not a positive multiple of blocks_per_axis {blocks_per_axis}"
    )]
    MapSizeNotMultipleOfBlocksPerAxis { map_size: i32, blocks_per_axis: i32 },

    /// The compression threshold for a layer must evenly divide `block_size`.
    #[error(
        "compression threshold {threshold} does not divide block size {block_size}"
    )]
    ThresholdDoesNotDivideBlockSize { threshold: i32, block_size: i32 },

    /// The terrain sampler's declared [`crate::TerrainSampler::map_size`] must
    /// agree with [`crate::MeshSettings::map_size`] -- the driver samples the
    /// oracle using the settings' side length, so a mismatch means every cell
    /// past the shorter of the two would be sampled outside the oracle's own
    /// idea of the map, or the mesh would silently cover less than the oracle
    /// has data for.
    #[error(
        "terrain sampler reports map_size {sampler_map_size}, but settings specify {settings_map_size}"
    )]
    SamplerMapSizeMismatch {
        sampler_map_size: i32,
        settings_map_size: i32,
    },
}
