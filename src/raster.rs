//! Pathability raster builder: turns the heightmap/terrain-type oracle into
//! one `{0, -1}` grid per layer for a single block.
//!
//! The scratch caches below are sized once per [`crate::MeshGenerator::generate`]
//! call and reused across every block rather than reallocated per block.
use crate::{settings::MeshSettings, terrain::TerrainSampler, Layer};

/// A single layer's `{0, -1}` pathability grid for one block, `block_size *
/// block_size` cells, row-major `(z, x)`.
pub(crate) struct Raster {
    s: i32,
    cells: Vec<i32>,
}

impl Raster {
    fn filled(s: i32, value: i32) -> Self {
        Self {
            s,
            cells: vec![value; (s * s) as usize],
        }
    }

    #[inline]
    fn index(&self, x: i32, z: i32) -> usize {
        (z * self.s + x) as usize
    }

    #[inline]
    pub(crate) fn get(&self, x: i32, z: i32) -> i32 {
        self.cells[self.index(x, z)]
    }

    #[inline]
    fn set(&mut self, x: i32, z: i32, value: i32) {
        let i = self.index(x, z);
        self.cells[i] = value;
    }

    /// Whether every cell in the `c x c` square whose top-left is `(ox, oz)`
    /// equals `value`.
    pub(crate) fn is_uniform(&self, ox: i32, oz: i32, c: i32, value: i32) -> bool {
        for z in oz..oz + c {
            for x in ox..ox + c {
                if self.get(x, z) != value {
                    return false;
                }
            }
        }
        true
    }
}

/// Scratch caches for one block, reused across blocks within a single
/// `generate()` call. Must not be retained after that call returns.
pub(crate) struct BlockCaches {
    s: i32,
    /// Corner heights, `(s+1) x (s+1)`.
    terrain: Vec<f32>,
    /// Corner surface-minus-terrain depth, `(s+1) x (s+1)`.
    depth: Vec<f32>,
    /// Horizontal walkability between adjacent corners, `(s+1) x s`.
    px_walk: Vec<bool>,
    /// Vertical walkability between adjacent corners, `s x (s+1)`.
    pz_walk: Vec<bool>,
    /// All four walks around a cell true, `s x s`.
    cell_walk: Vec<bool>,
    /// Mean of the four corner depths around a cell, `s x s`.
    avg_depth: Vec<f32>,
    /// Non-blocking terrain type at a cell, `s x s`.
    terrain_ok: Vec<bool>,
}

impl BlockCaches {
    pub(crate) fn new(block_size: i32) -> Self {
        let s = block_size;
        let corners = ((s + 1) * (s + 1)) as usize;
        let cells = (s * s) as usize;
        Self {
            s,
            terrain: vec![0.0; corners],
            depth: vec![0.0; corners],
            px_walk: vec![false; ((s + 1) * s) as usize],
            pz_walk: vec![false; (s * (s + 1)) as usize],
            cell_walk: vec![false; cells],
            avg_depth: vec![0.0; cells],
            terrain_ok: vec![false; cells],
        }
    }

    #[inline]
    fn corner_index(&self, x: i32, z: i32) -> usize {
        (z * (self.s + 1) + x) as usize
    }
    #[inline]
    fn px_index(&self, x: i32, z: i32) -> usize {
        (z * self.s + x) as usize
    }
    #[inline]
    fn pz_index(&self, x: i32, z: i32) -> usize {
        (z * (self.s + 1) + x) as usize
    }
    #[inline]
    fn cell_index(&self, x: i32, z: i32) -> usize {
        (z * self.s + x) as usize
    }

    /// Repopulates every cache for the block whose top-left world corner is
    /// `(bx, bz)`, sampling `sampler` for heights and terrain type.
    fn fill(&mut self, sampler: &impl TerrainSampler, bx: i32, bz: i32, max_height_diff: f32) {
        let s = self.s;

        for z in 0..=s {
            for x in 0..=s {
                let terrain_h = sampler.terrain_height(bx + x, bz + z);
                let surface_h = sampler.surface_height(bx + x, bz + z);
                let terrain_h = if terrain_h.is_nan() {
                    tracing::warn!(x = bx + x, z = bz + z, "oracle returned NaN terrain height");
                    f32::INFINITY
                } else {
                    terrain_h
                };
                let i = self.corner_index(x, z);
                self.terrain[i] = terrain_h;
                self.depth[i] = (surface_h - terrain_h).max(0.0);
            }
        }

        for z in 0..=s {
            for x in 0..s {
                let a = self.terrain[self.corner_index(x, z)];
                let b = self.terrain[self.corner_index(x + 1, z)];
                let i = self.px_index(x, z);
                self.px_walk[i] = (a - b).abs() < max_height_diff;
            }
        }
        for z in 0..s {
            for x in 0..=s {
                let a = self.terrain[self.corner_index(x, z)];
                let b = self.terrain[self.corner_index(x, z + 1)];
                let i = self.pz_index(x, z);
                self.pz_walk[i] = (a - b).abs() < max_height_diff;
            }
        }

        for z in 0..s {
            for x in 0..s {
                let walk = self.px_walk[self.px_index(x, z)]
                    && self.pz_walk[self.pz_index(x, z)]
                    && self.px_walk[self.px_index(x, z + 1)]
                    && self.pz_walk[self.pz_index(x + 1, z)];
                self.cell_walk[self.cell_index(x, z)] = walk;

                let d00 = self.depth[self.corner_index(x, z)];
                let d10 = self.depth[self.corner_index(x + 1, z)];
                let d01 = self.depth[self.corner_index(x, z + 1)];
                let d11 = self.depth[self.corner_index(x + 1, z + 1)];
                self.avg_depth[self.cell_index(x, z)] = (d00 + d10 + d01 + d11) / 4.0;

                self.terrain_ok[self.cell_index(x, z)] = !sampler.terrain_type(bx + x, bz + z).blocking;
            }
        }
    }

    fn avg_depth_at(&self, x: i32, z: i32) -> f32 {
        self.avg_depth[self.cell_index(x, z)]
    }
    fn cell_walk_at(&self, x: i32, z: i32) -> bool {
        self.cell_walk[self.cell_index(x, z)]
    }
    fn terrain_ok_at(&self, x: i32, z: i32) -> bool {
        self.terrain_ok[self.cell_index(x, z)]
    }
}

/// All five layers' rasters for one block, produced by a single pass over a
/// freshly-[`BlockCaches::fill`]ed block.
pub(crate) struct BlockRasters {
    pub(crate) land: Raster,
    pub(crate) water: Raster,
    pub(crate) hover: Raster,
    pub(crate) amphibious: Raster,
    pub(crate) air: Raster,
}

impl BlockRasters {
    pub(crate) fn get(&self, layer: Layer) -> &Raster {
        match layer {
            Layer::Land => &self.land,
            Layer::Water => &self.water,
            Layer::Hover => &self.hover,
            Layer::Amphibious => &self.amphibious,
            Layer::Air => &self.air,
        }
    }
}

/// Refills `caches` for the block at `(bx, bz)` and derives all five layers'
/// pathability rasters from it.
pub(crate) fn build_block_rasters(
    caches: &mut BlockCaches,
    sampler: &impl TerrainSampler,
    settings: &MeshSettings,
    bx: i32,
    bz: i32,
) -> BlockRasters {
    caches.fill(sampler, bx, bz, settings.max_height_diff);

    let s = caches.s;
    let mut land = Raster::filled(s, -1);
    let mut water = Raster::filled(s, -1);
    let mut hover = Raster::filled(s, -1);
    let mut amphibious = Raster::filled(s, -1);
    let air = Raster::filled(s, 0);

    for z in 0..s {
        for x in 0..s {
            let avg_depth = caches.avg_depth_at(x, z);
            let terrain_ok = caches.terrain_ok_at(x, z);
            let cell_walk = caches.cell_walk_at(x, z);

            if avg_depth <= 0.0 && terrain_ok && cell_walk {
                land.set(x, z, 0);
            }
            if terrain_ok && (avg_depth >= 1.0 || cell_walk) {
                hover.set(x, z, 0);
            }
            if avg_depth >= settings.min_water_depth_naval && terrain_ok {
                water.set(x, z, 0);
            }
            if avg_depth <= settings.max_water_depth_amphibious && terrain_ok && cell_walk {
                amphibious.set(x, z, 0);
            }
        }
    }

    BlockRasters {
        land,
        water,
        hover,
        amphibious,
        air,
    }
}
