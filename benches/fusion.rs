//! Benchmark frame fusion and snapshot operations.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::f32::consts::TAU;
use vayu_grid::grid::traversal::VoxelRay;
use vayu_grid::{
    Coordinator, Frame, FusionEngine, GridLayout, MapConfig, Point3, Pose, Quaternion,
    RangeSample, transform_frame,
};

/// Depth frame from the center of a 6m box room.
fn room_frame(width: usize, height: usize) -> Frame {
    let sensor = Point3::new(5.0, 5.0, 5.0);
    let (lo, hi) = (2.0_f32, 8.0_f32);
    let mut samples = Vec::with_capacity(width * height);

    for i in 0..width {
        let azimuth = i as f32 / width as f32 * TAU;
        for j in 0..height {
            let elevation = -1.0 + 2.0 * (j as f32 + 0.5) / height as f32;
            let direction = RangeSample::from_angles(azimuth, elevation, 1.0).direction;

            // Simple room ray casting
            let mut range = f32::INFINITY;
            for (p, d) in [
                (sensor.x, direction.x),
                (sensor.y, direction.y),
                (sensor.z, direction.z),
            ] {
                if d > 0.0 {
                    range = range.min((hi - p) / d);
                } else if d < 0.0 {
                    range = range.min((lo - p) / d);
                }
            }
            samples.push(RangeSample::new(direction, range));
        }
    }

    Frame::new(0, samples)
}

fn room_pose() -> Pose {
    Pose::new(Quaternion::identity(), Point3::new(5.0, 5.0, 5.0)).unwrap()
}

fn bench_integrate(c: &mut Criterion) {
    let config = MapConfig::default();
    let mut engine = FusionEngine::new(&config.grid, config.log_odds.clone());
    let frame = room_frame(64, 48);
    let transformed = transform_frame(&frame, &room_pose(), &config.sensor, engine.layout());

    // Warm up
    for _ in 0..5 {
        engine.integrate(&transformed);
    }

    c.bench_function("integrate_64x48", |b| {
        b.iter(|| {
            let stats = engine.integrate(black_box(&transformed));
            black_box(stats)
        })
    });
}

fn bench_integrate_resolutions(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate_samples");

    for (width, height) in [(32, 24), (64, 48), (160, 120)].iter() {
        let config = MapConfig::default();
        let mut engine = FusionEngine::new(&config.grid, config.log_odds.clone());
        let frame = room_frame(*width, *height);
        let transformed = transform_frame(&frame, &room_pose(), &config.sensor, engine.layout());

        group.bench_with_input(
            BenchmarkId::from_parameter(width * height),
            &transformed,
            |b, transformed| {
                b.iter(|| {
                    let stats = engine.integrate(black_box(transformed));
                    black_box(stats)
                })
            },
        );
    }

    group.finish();
}

fn bench_process_frame(c: &mut Criterion) {
    let coordinator = Coordinator::new(MapConfig::default()).unwrap();
    let frame = room_frame(64, 48);
    let origin = Point3::new(5.0, 5.0, 5.0);

    c.bench_function("process_frame_64x48", |b| {
        b.iter(|| {
            let report = coordinator.process_frame(
                black_box(&frame),
                Quaternion::identity(),
                black_box(origin),
            );
            black_box(report)
        })
    });
}

fn bench_traversal(c: &mut Criterion) {
    let layout = GridLayout::new(&MapConfig::default().grid);
    let start = Point3::new(0.05, 0.05, 0.05);
    let end = Point3::new(9.93, 7.41, 8.62);

    c.bench_function("voxel_ray_diagonal", |b| {
        b.iter(|| {
            let n = VoxelRay::new(black_box(start), black_box(end), &layout).count();
            black_box(n)
        })
    });

    let config = MapConfig::default();
    let mut engine = FusionEngine::new(&config.grid, config.log_odds.clone());
    c.bench_function("integrate_ray_diagonal", |b| {
        b.iter(|| {
            let result = engine.integrate_ray(black_box(start), black_box(end));
            black_box(result)
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let coordinator = Coordinator::new(MapConfig::default()).unwrap();
    let frame = room_frame(64, 48);
    let origin = Point3::new(5.0, 5.0, 5.0);

    coordinator
        .process_frame(&frame, Quaternion::identity(), origin)
        .unwrap();
    let older = coordinator.latest_snapshot().unwrap();
    coordinator
        .process_frame(&frame, Quaternion::identity(), origin)
        .unwrap();
    let newer = coordinator.latest_snapshot().unwrap();

    c.bench_function("snapshot_counts", |b| {
        b.iter(|| black_box(newer.counts()))
    });

    c.bench_function("changed_chunks_since", |b| {
        b.iter(|| black_box(newer.changed_chunks_since(black_box(&older))))
    });
}

criterion_group!(
    benches,
    bench_integrate,
    bench_integrate_resolutions,
    bench_process_frame,
    bench_traversal,
    bench_snapshot
);
criterion_main!(benches);
