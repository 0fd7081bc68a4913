//! Shared test fixture: an in-memory heightmap/terrain-type sampler, backed
//! by plain `Vec` grids instead of physics colliders.
use strata_navmesh::{Marker, MarkerKind, MarkerSource, TerrainSampler, TerrainType};

/// A square heightmap/terrain-type oracle backed by flat `Vec<f32>`/`Vec<bool>`
/// grids, sized for a map of `size x size` cells.
pub struct GridSampler {
    size: i32,
    /// Corner heights, `(size+1) x (size+1)`.
    terrain: Vec<f32>,
    /// Corner surface heights, `(size+1) x (size+1)`.
    surface: Vec<f32>,
    /// Per-cell blocking flag, `size x size`.
    blocking: Vec<bool>,
}

impl GridSampler {
    /// A flat, fully walkable, dry map: `terrain == surface == 0`, nothing
    /// blocking.
    pub fn flat(size: i32) -> Self {
        let corners = ((size + 1) * (size + 1)) as usize;
        let cells = (size * size) as usize;
        Self {
            size,
            terrain: vec![0.0; corners],
            surface: vec![0.0; corners],
            blocking: vec![false; cells],
        }
    }

    #[inline]
    fn corner_index(&self, x: i32, z: i32) -> usize {
        (z * (self.size + 1) + x) as usize
    }

    #[inline]
    fn cell_index(&self, x: i32, z: i32) -> usize {
        (z * self.size + x) as usize
    }

    /// Raises the water table so every corner in `[x0, x1] x [z0, z1]`
    /// (inclusive) has `surface = terrain + depth`.
    pub fn flood(&mut self, x0: i32, z0: i32, x1: i32, z1: i32, depth: f32) {
        for z in z0..=z1 {
            for x in x0..=x1 {
                if x < 0 || z < 0 || x > self.size || z > self.size {
                    continue;
                }
                let i = self.corner_index(x, z);
                self.surface[i] = self.terrain[i] + depth;
            }
        }
    }

    /// Marks every cell in `[x0, x1] x [z0, z1]` (inclusive, cell space) as
    /// terrain-type blocking.
    pub fn block(&mut self, x0: i32, z0: i32, x1: i32, z1: i32) {
        for z in z0..=z1 {
            for x in x0..=x1 {
                if x < 0 || z < 0 || x >= self.size || z >= self.size {
                    continue;
                }
                let i = self.cell_index(x, z);
                self.blocking[i] = true;
            }
        }
    }

    /// Marks a single cell `(x, z)` as terrain-type blocking.
    pub fn block_cell(&mut self, x: i32, z: i32) {
        self.block(x, z, x, z);
    }
}

impl TerrainSampler for GridSampler {
    fn terrain_height(&self, x: i32, z: i32) -> f32 {
        if x < 0 || z < 0 || x > self.size || z > self.size {
            return 0.0;
        }
        self.terrain[self.corner_index(x, z)]
    }

    fn surface_height(&self, x: i32, z: i32) -> f32 {
        if x < 0 || z < 0 || x > self.size || z > self.size {
            return 0.0;
        }
        self.surface[self.corner_index(x, z)]
    }

    fn terrain_type(&self, x: i32, z: i32) -> TerrainType {
        if x < 0 || z < 0 || x >= self.size || z >= self.size {
            return TerrainType { blocking: true };
        }
        TerrainType {
            blocking: self.blocking[self.cell_index(x, z)],
        }
    }

    fn map_size(&self) -> i32 {
        self.size
    }
}

/// A [`MarkerSource`] over a fixed, in-memory list of mass/hydrocarbon
/// markers, for tests that only need one kind populated.
pub struct FixedMarkers {
    pub mass: Vec<Marker>,
    pub hydrocarbon: Vec<Marker>,
}

impl FixedMarkers {
    pub fn none() -> Self {
        Self {
            mass: Vec::new(),
            hydrocarbon: Vec::new(),
        }
    }

    pub fn with_mass(markers: Vec<Marker>) -> Self {
        Self {
            mass: markers,
            hydrocarbon: Vec::new(),
        }
    }
}

impl MarkerSource for FixedMarkers {
    fn markers_mut(&mut self, kind: MarkerKind) -> &mut [Marker] {
        match kind {
            MarkerKind::Mass => &mut self.mass,
            MarkerKind::Hydrocarbon => &mut self.hydrocarbon,
        }
    }
}
