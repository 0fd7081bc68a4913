//! Integration tests for the six concrete scenarios used to validate mesh
//! construction end to end, one test per scenario.
mod common;

use common::{FixedMarkers, GridSampler};
use glam::Vec3;
use strata_navmesh::{Layer, Marker, MeshGenerator, MeshSettings};

/// Scenario 1: a flat 1024x1024 all-land map (16 blocks per axis, block size
/// 64) collapses to 16x16 single-leaf block roots, with one Land component
/// covering all 256 leaves.
#[test]
fn flat_map_collapses_to_one_land_component_per_block() {
    let sampler = GridSampler::flat(1024);
    let settings = MeshSettings::with_map_size(1024);
    let mut mesh = MeshGenerator::new(settings);

    let stats = mesh.generate(&sampler, &mut FixedMarkers::none()).unwrap();

    assert_eq!(stats.land.pathable_leafs, 256);
    assert_eq!(stats.land.unpathable_leafs, 0);
    assert_eq!(stats.land.subdivisions, 0);
    assert_eq!(stats.land.labels, 1);
    assert_eq!(stats.water.labels, 0);

    let land_area: f32 = mesh
        .nav_labels()
        .values()
        .filter(|m| m.layer == Layer::Land)
        .map(|m| m.area)
        .sum();
    // 256 leaves, each a whole 64x64 block: area = 256 * (64 * 0.01)^2.
    assert!((land_area - 104.8576).abs() < 1e-3);
}

/// Scenario 2: a 16x16 map (one block) with a central 2x2 impassable patch
/// isolates the patch by subdividing; the remaining land forms one
/// component whose area excludes the patch.
#[test]
fn central_impassable_patch_is_isolated_by_subdivision() {
    let mut sampler = GridSampler::flat(16);
    sampler.block(8, 8, 9, 9);
    // The surviving component's area (0.0252) is below the default culling
    // threshold and holds no resources; disable culling so this scenario
    // exercises subdivision/labelling in isolation.
    let settings = MeshSettings::with_map_size(16)
        .with_blocks_per_axis(1)
        .with_culling_area_threshold(0.0);
    let mut mesh = MeshGenerator::new(settings);

    let stats = mesh.generate(&sampler, &mut FixedMarkers::none()).unwrap();

    assert!(stats.land.subdivisions > 0);
    assert_eq!(stats.land.labels, 1);

    let land = mesh
        .nav_labels()
        .values()
        .find(|m| m.layer == Layer::Land)
        .expect("one surviving land component");
    assert!((land.area - 0.0252).abs() < 1e-6);

    let grid = mesh.nav_grid(Layer::Land);
    let patch_leaf = grid
        .find_leaf_xz(mesh.arena(), 8.5, 8.5)
        .expect("patch cell must resolve to a leaf");
    assert_eq!(patch_leaf.leaf().unwrap().label, -1);
}

/// Scenario 3: a 32x32 map split by a depth-2 river. Land splits into two
/// components on either side; Hover, which tolerates both water and dry
/// land, stays a single component spanning both banks and the river.
#[test]
fn river_splits_land_but_not_hover() {
    // Flood corners x in [16, 24] so the 8-wide band x in [16, 24) reaches
    // MinNaval depth and aligns with the quadtree's eighth-level grid; the
    // single-cell-wide transition columns either side (avg depth 1.0) are
    // neither land- nor water-pathable, widening the land gap to x in
    // [15, 24] without breaking water's coarser (double-threshold) grain.
    let mut sampler = GridSampler::flat(32);
    sampler.flood(16, 0, 24, 32, 2.0);
    // Both banks are below the default culling threshold and hold no
    // resources; disable culling so the scenario tests labelling, not culling.
    let settings = MeshSettings::with_map_size(32)
        .with_blocks_per_axis(1)
        .with_culling_area_threshold(0.0);
    let mut mesh = MeshGenerator::new(settings);

    let stats = mesh.generate(&sampler, &mut FixedMarkers::none()).unwrap();

    assert_eq!(stats.land.labels, 2);
    assert!(stats.water.labels >= 1);
    assert_eq!(stats.hover.labels, 1);

    let land_grid = mesh.nav_grid(Layer::Land);
    let west_bank = land_grid
        .find_leaf_xz(mesh.arena(), 5.5, 5.5)
        .expect("west bank must be land");
    let east_bank = land_grid
        .find_leaf_xz(mesh.arena(), 29.5, 5.5)
        .expect("east bank must be land");
    assert_ne!(
        west_bank.leaf().unwrap().label,
        east_bank.leaf().unwrap().label
    );
}

/// Scenario 4: a one-cell-wide diagonal staircase of impassable pixels
/// separates two land masses that only touch at corners. The corner-cut
/// rule must refuse every diagonal crossing, so the two masses receive
/// distinct labels rather than merging.
#[test]
fn diagonal_staircase_blocks_corner_crossings() {
    let size = 8;
    let mut sampler = GridSampler::flat(size);
    for i in 0..size {
        sampler.block_cell(i, i);
    }
    // Both triangles are below the default culling threshold and hold no
    // resources; disable culling so the scenario tests the corner-cut rule,
    // not culling.
    let settings = MeshSettings::with_map_size(size)
        .with_blocks_per_axis(1)
        .with_compression_threshold(1)
        .with_culling_area_threshold(0.0);
    let mut mesh = MeshGenerator::new(settings);

    let stats = mesh.generate(&sampler, &mut FixedMarkers::none()).unwrap();
    assert!(stats.land.labels >= 2);

    let grid = mesh.nav_grid(Layer::Land);
    // (0, size-1) sits in the x < z triangle, (size-1, 0) in the x > z triangle.
    let lower = grid
        .find_leaf_xz(mesh.arena(), 0.5, size as f32 - 0.5)
        .expect("lower triangle must be land");
    let upper = grid
        .find_leaf_xz(mesh.arena(), size as f32 - 0.5, 0.5)
        .expect("upper triangle must be land");
    assert_ne!(lower.leaf().unwrap().label, upper.leaf().unwrap().label);
}

/// Scenario 5: an isolated, resourceless island below the culling area
/// threshold ends up fully impassable after `generate()`.
#[test]
fn small_resourceless_island_is_culled() {
    let size = 16;
    // Block everything except a 2x2 pocket in one corner.
    let mut sampler = GridSampler::flat(size);
    for z in 0..size {
        for x in 0..size {
            if !(x < 2 && z < 2) {
                sampler.block_cell(x, z);
            }
        }
    }

    let settings = MeshSettings::with_map_size(size).with_blocks_per_axis(1);
    let mut mesh = MeshGenerator::new(settings);

    let stats = mesh.generate(&sampler, &mut FixedMarkers::none()).unwrap();
    assert_eq!(stats.land.labels, 1);
    assert!(stats.culled_labels >= 1);
    assert!(mesh
        .nav_labels()
        .values()
        .all(|m| m.layer != Layer::Land));

    let grid = mesh.nav_grid(Layer::Land);
    let island_leaf = grid
        .find_leaf_xz(mesh.arena(), 0.5, 0.5)
        .expect("island cell still resolves to a leaf");
    assert_eq!(island_leaf.leaf().unwrap().label, -1);
}

/// Scenario 6: a mass marker placed on an impassable leaf never resolves to
/// a label; no component metadata is touched.
#[test]
fn marker_on_impassable_leaf_stays_unbound() {
    let size = 16;
    let mut sampler = GridSampler::flat(size);
    sampler.block_cell(8, 8);

    let settings = MeshSettings::with_map_size(size).with_blocks_per_axis(1);
    let mut mesh = MeshGenerator::new(settings);

    let mut markers = FixedMarkers::with_mass(vec![Marker::new(Vec3::new(8.5, 0.0, 8.5))]);
    mesh.generate(&sampler, &mut markers).unwrap();

    assert_eq!(markers.mass[0].label, None);
    assert_eq!(markers.mass[0].layer, None);
    assert!(mesh
        .nav_labels()
        .values()
        .all(|m| m.num_extractors == 0 && m.num_hydrocarbons == 0));
}
