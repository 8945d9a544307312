//! Test utilities for VayuGrid integration tests.
//!
//! Helpers for building coordinators and synthetic depth frames.

#![allow(dead_code)]

use rand::prelude::*;
use vayu_grid::{Coordinator, Frame, MapConfig, Point3, RangeSample};

/// Enable log output for a test run (`RUST_LOG=debug cargo test`).
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Coordinator over the default 10m cube at 0.1m.
pub fn default_coordinator() -> Coordinator {
    Coordinator::new(MapConfig::default()).expect("default config is valid")
}

/// Single sensor-frame point as a frame.
pub fn point_frame(timestamp_ns: u64, point: Point3) -> Frame {
    Frame::from_points(timestamp_ns, &[point])
}

/// Depth frame seen from `sensor` inside an axis-aligned box room.
///
/// Rays are spread over `azimuth_steps × elevation_steps` directions in the
/// world frame (identity orientation assumed); each range is the distance to
/// the room wall.
pub fn room_frame(
    timestamp_ns: u64,
    sensor: Point3,
    room_min: Point3,
    room_max: Point3,
    azimuth_steps: usize,
    elevation_steps: usize,
) -> Frame {
    let mut samples = Vec::with_capacity(azimuth_steps * elevation_steps);
    for i in 0..azimuth_steps {
        let azimuth = i as f32 / azimuth_steps as f32 * std::f32::consts::TAU;
        for j in 0..elevation_steps {
            let elevation = -1.2 + 2.4 * (j as f32 + 0.5) / elevation_steps as f32;
            let sample = RangeSample::from_angles(azimuth, elevation, 1.0);
            let range = distance_to_wall(sensor, sample.direction, room_min, room_max);
            samples.push(RangeSample::new(sample.direction, range));
        }
    }
    Frame::new(timestamp_ns, samples)
}

fn distance_to_wall(p: Point3, d: Point3, min: Point3, max: Point3) -> f32 {
    let mut t = f32::INFINITY;
    for (pos, dir, lo, hi) in [
        (p.x, d.x, min.x, max.x),
        (p.y, d.y, min.y, max.y),
        (p.z, d.z, min.z, max.z),
    ] {
        if dir > 0.0 {
            t = t.min((hi - pos) / dir);
        } else if dir < 0.0 {
            t = t.min((lo - pos) / dir);
        }
    }
    t
}

/// Frame of uniformly random points, some deliberately outside the grid.
pub fn random_frame(rng: &mut StdRng, timestamp_ns: u64, points: usize) -> Frame {
    let samples = (0..points)
        .map(|_| {
            let direction = Point3::new(
                rng.random::<f32>() * 2.0 - 1.0,
                rng.random::<f32>() * 2.0 - 1.0,
                rng.random::<f32>() * 2.0 - 1.0,
            );
            let range = rng.random::<f32>() * 14.0;
            RangeSample::new(direction, range)
        })
        .collect();
    Frame::new(timestamp_ns, samples)
}

/// Random position inside the default grid.
pub fn random_position(rng: &mut StdRng) -> Point3 {
    Point3::new(
        0.5 + rng.random::<f32>() * 9.0,
        0.5 + rng.random::<f32>() * 9.0,
        0.5 + rng.random::<f32>() * 9.0,
    )
}
