use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use voxelview_common::GridDims;
use voxelview_kernel::VoxelGrid;
use voxelview_render::{Camera, DrawRecorder, TileAtlas, Viewport, render_frame};

fn bench_generate(dims: GridDims, iterations: usize) {
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(VoxelGrid::generate(black_box(dims)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  generate ({}x{}x{}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        dims.size_x, dims.size_y, dims.size_z
    );
}

fn bench_record_frame(dims: GridDims, iterations: usize) {
    let grid = VoxelGrid::generate(dims);
    let camera = Camera::new(Vec3::new(
        dims.size_x as f32 / 2.0,
        dims.size_y as f32,
        dims.size_z as f32 / 2.0,
    ));
    let atlas = TileAtlas::default();
    let viewport = Viewport::new(1280, 720);
    let mut recorder = DrawRecorder::new();

    let start = Instant::now();
    let mut draws = 0;
    for _ in 0..iterations {
        recorder.reset();
        let stats = render_frame(&mut recorder, black_box(&grid), &camera, &atlas, viewport);
        draws = black_box(stats.draws);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  record frame ({draws} draws, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Frame Benchmarks ===\n");

    println!("World generation:");
    bench_generate(GridDims::new(16, 8, 16), 1000);
    bench_generate(GridDims::new(64, 32, 64), 50);

    println!("\nFrame recording (one draw per solid cell):");
    bench_record_frame(GridDims::new(16, 8, 16), 1000);
    bench_record_frame(GridDims::new(64, 32, 64), 20);

    println!("\n=== Done ===");
}
