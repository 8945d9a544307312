//! Occupancy fusion: applies one transformed frame to the working volume.
//!
//! Each frame is reduced to two disjoint voxel sets before anything is written:
//! - hit voxels: voxels containing an in-extent endpoint
//! - free voxels: voxels crossed by a ray on its way to a hit, minus hit voxels
//!
//! Every voxel is therefore updated at most once per frame, and a voxel that
//! is both crossed and hit in the same frame is treated as hit.
//!
//! Rays starting outside the grid are clipped to the grid box first. Rays whose
//! endpoint is outside the grid are dropped entirely.

use std::collections::HashSet;

use log::trace;

use super::config::{GridConfig, LogOddsConfig};
use super::layout::GridLayout;
use super::snapshot::VoxelSnapshot;
use super::traversal::{VoxelRay, clip_segment};
use super::volume::VoxelVolume;
use crate::core::{Point3, VoxelCoord};
use crate::error::{FrameError, Result};
use crate::geometry::TransformedFrame;

/// Result of integrating one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FusionStats {
    /// Rays traced (one per in-extent endpoint)
    pub rays: usize,
    /// Voxels that received a hit
    pub hits: usize,
    /// Voxels that received a miss
    pub carved: usize,
    /// Endpoints dropped as outside the grid
    pub dropped: usize,
}

impl FusionStats {
    /// Total voxels updated
    #[inline]
    pub fn voxels_updated(&self) -> usize {
        self.hits + self.carved
    }

    /// Nothing was written
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels_updated() == 0
    }
}

/// Owns the working volume and the publish counter.
pub struct FusionEngine {
    volume: VoxelVolume,
    version: u64,
    last_timestamp_ns: Option<u64>,
    // Scratch sets, reused across frames
    hit_voxels: HashSet<VoxelCoord>,
    free_voxels: HashSet<VoxelCoord>,
}

impl FusionEngine {
    /// Create an engine over an all-unknown volume.
    pub fn new(grid: &GridConfig, log_odds: LogOddsConfig) -> Self {
        Self {
            volume: VoxelVolume::new(grid, log_odds),
            version: 0,
            last_timestamp_ns: None,
            hit_voxels: HashSet::new(),
            free_voxels: HashSet::new(),
        }
    }

    /// Grid geometry.
    #[inline]
    pub fn layout(&self) -> &GridLayout {
        self.volume.layout()
    }

    /// Read access to the working volume.
    #[inline]
    pub fn volume(&self) -> &VoxelVolume {
        &self.volume
    }

    /// Version of the last frozen snapshot (0 = none yet).
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Timestamp of the last accepted frame.
    #[inline]
    pub fn last_timestamp_ns(&self) -> Option<u64> {
        self.last_timestamp_ns
    }

    /// Reject timestamps older than the last accepted frame.
    pub fn check_timestamp(&self, timestamp_ns: u64) -> Result<()> {
        match self.last_timestamp_ns {
            Some(last_ns) if timestamp_ns < last_ns => Err(FrameError::OutOfOrder {
                timestamp_ns,
                last_ns,
            }),
            _ => Ok(()),
        }
    }

    /// Fuse one frame into the working volume.
    pub fn integrate(&mut self, frame: &TransformedFrame) -> FusionStats {
        self.last_timestamp_ns = Some(frame.timestamp_ns);
        self.hit_voxels.clear();
        self.free_voxels.clear();

        let mut stats = FusionStats {
            dropped: frame.out_of_extent(),
            ..Default::default()
        };

        for point in frame.hits() {
            self.hit_voxels.insert(point.voxel);
        }

        let layout = *self.volume.layout();
        let (min, max) = layout.bounds();
        let origin = frame.ray_origin;
        let origin_inside = layout.contains_point(origin);

        for point in frame.hits() {
            stats.rays += 1;

            let start = if origin_inside {
                origin
            } else {
                match clip_segment(origin, point.position, min, max) {
                    Some((t_enter, _)) => origin + (point.position - origin) * t_enter,
                    None => continue,
                }
            };

            for voxel in VoxelRay::new(start, point.position, &layout) {
                if layout.contains_voxel(voxel) && !self.hit_voxels.contains(&voxel) {
                    self.free_voxels.insert(voxel);
                }
            }
        }

        for &voxel in &self.free_voxels {
            if self.volume.apply_miss(voxel).is_some() {
                stats.carved += 1;
            }
        }
        for &voxel in &self.hit_voxels {
            if self.volume.apply_hit(voxel).is_some() {
                stats.hits += 1;
            }
        }

        trace!(
            "[Fusion] frame {} ns: {} rays, {} hits, {} carved, {} dropped",
            frame.timestamp_ns, stats.rays, stats.hits, stats.carved, stats.dropped
        );
        stats
    }

    /// Freeze the working volume into the next snapshot version.
    pub fn snapshot(&mut self, timestamp_ns: u64) -> VoxelSnapshot {
        self.version += 1;
        self.volume.freeze(self.version, timestamp_ns)
    }

    /// Clear the volume and forget the last timestamp.
    ///
    /// The version counter keeps counting so snapshots published after a reset
    /// never reuse a version number.
    pub fn reset(&mut self) {
        self.volume.clear();
        self.last_timestamp_ns = None;
    }

    /// Apply a single ray directly, bypassing frame bookkeeping.
    ///
    /// Returns the number of voxels carved and whether the hit was applied.
    pub fn integrate_ray(&mut self, origin: Point3, endpoint: Point3) -> (usize, bool) {
        let layout = *self.volume.layout();
        let hit = layout.world_to_voxel(endpoint);
        if !endpoint.is_finite() || !layout.contains_voxel(hit) {
            return (0, false);
        }

        let start = if layout.contains_point(origin) {
            origin
        } else {
            let (min, max) = layout.bounds();
            match clip_segment(origin, endpoint, min, max) {
                Some((t_enter, _)) => origin + (endpoint - origin) * t_enter,
                None => return (0, self.volume.apply_hit(hit).is_some()),
            }
        };

        let mut carved = 0;
        for voxel in VoxelRay::new(start, endpoint, &layout) {
            if voxel != hit && self.volume.apply_miss(voxel).is_some() {
                carved += 1;
            }
        }
        (carved, self.volume.apply_hit(hit).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Frame, Pose};
    use crate::geometry::transform_frame;
    use crate::grid::config::SensorConfig;
    use crate::grid::chunk::VoxelState;

    fn engine() -> FusionEngine {
        FusionEngine::new(&GridConfig::default(), LogOddsConfig::default())
    }

    fn transform(engine: &FusionEngine, frame: &Frame, pose: &Pose) -> TransformedFrame {
        transform_frame(frame, pose, &SensorConfig::default(), engine.layout())
    }

    #[test]
    fn test_single_ray() {
        let mut engine = engine();
        let frame = Frame::from_points(1, &[Point3::new(1.0, 0.0, 0.0)]);
        let stats = engine.integrate(&transform(&engine, &frame, &Pose::identity()));

        assert_eq!(stats.rays, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.carved, 10);

        let volume = engine.volume();
        assert_eq!(volume.voxel(VoxelCoord::new(10, 0, 0)).unwrap().log_odds, 85);
        for x in 0..10 {
            assert_eq!(volume.voxel(VoxelCoord::new(x, 0, 0)).unwrap().log_odds, -40);
        }
        assert!(!volume.voxel(VoxelCoord::new(11, 0, 0)).unwrap().observed);
    }

    #[test]
    fn test_hit_wins_over_carve_within_frame() {
        let mut engine = engine();
        // The second ray passes through the first ray's hit voxel
        let frame = Frame::from_points(
            1,
            &[Point3::new(0.5, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
        );
        let pose = Pose::new(Default::default(), Point3::new(0.05, 0.05, 0.05)).unwrap();
        let stats = engine.integrate(&transform(&engine, &frame, &pose));

        // Free: 0..=9 except the hit voxel 5
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.carved, 9);

        let snapshot = engine.snapshot(1);
        assert_eq!(snapshot.log_odds(VoxelCoord::new(5, 0, 0)), Some(85));
        assert_eq!(snapshot.log_odds(VoxelCoord::new(4, 0, 0)), Some(-40));
    }

    #[test]
    fn test_shared_voxels_updated_once() {
        let mut engine = engine();
        // Two rays hitting the same voxel through the same corridor
        let frame = Frame::from_points(
            1,
            &[Point3::new(1.01, 0.01, 0.01), Point3::new(1.02, 0.02, 0.02)],
        );
        let stats = engine.integrate(&transform(&engine, &frame, &Pose::identity()));

        assert_eq!(stats.rays, 2);
        assert_eq!(stats.hits, 1);
        let snapshot = engine.snapshot(1);
        assert_eq!(snapshot.log_odds(VoxelCoord::new(10, 0, 0)), Some(85));
        assert_eq!(snapshot.log_odds(VoxelCoord::new(0, 0, 0)), Some(-40));
    }

    #[test]
    fn test_out_of_extent_dropped_with_ray() {
        let mut engine = engine();
        let frame = Frame::from_points(1, &[Point3::new(15.0, 0.0, 0.0)]);
        let stats = engine.integrate(&transform(&engine, &frame, &Pose::identity()));

        assert_eq!(stats.dropped, 1);
        assert!(stats.is_empty());
        assert_eq!(engine.volume().touched_chunks(), 0);
    }

    #[test]
    fn test_origin_outside_grid_is_clipped() {
        let mut engine = engine();
        let pose = Pose::new(Default::default(), Point3::new(-2.05, 0.05, 0.05)).unwrap();
        let frame = Frame::from_points(1, &[Point3::new(3.0, 0.0, 0.0)]);
        let stats = engine.integrate(&transform(&engine, &frame, &pose));

        // Endpoint at x = 0.95 → voxel 9, carved voxels 0..9
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.carved, 9);
        let snapshot = engine.snapshot(1);
        assert!(snapshot.is_occupied(VoxelCoord::new(9, 0, 0)));
        assert_eq!(snapshot.log_odds(VoxelCoord::new(0, 0, 0)), Some(-40));
    }

    #[test]
    fn test_repeated_frames_saturate() {
        let mut engine = engine();
        let frame = Frame::from_points(1, &[Point3::new(1.0, 0.0, 0.0)]);
        let transformed = transform(&engine, &frame, &Pose::identity());
        for _ in 0..50 {
            engine.integrate(&transformed);
        }

        let snapshot = engine.snapshot(1);
        assert_eq!(snapshot.log_odds(VoxelCoord::new(10, 0, 0)), Some(350));
        assert_eq!(snapshot.log_odds(VoxelCoord::new(3, 0, 0)), Some(-200));
        assert_eq!(snapshot.state(VoxelCoord::new(3, 0, 0)), VoxelState::Free);
    }

    #[test]
    fn test_timestamp_order() {
        let mut engine = engine();
        assert!(engine.check_timestamp(0).is_ok());

        let frame = Frame::from_points(100, &[Point3::new(1.0, 0.0, 0.0)]);
        engine.integrate(&transform(&engine, &frame, &Pose::identity()));

        assert!(engine.check_timestamp(100).is_ok());
        assert_eq!(
            engine.check_timestamp(99),
            Err(FrameError::OutOfOrder {
                timestamp_ns: 99,
                last_ns: 100
            })
        );

        engine.reset();
        assert!(engine.check_timestamp(0).is_ok());
    }

    #[test]
    fn test_integrate_ray() {
        let mut engine = engine();
        let (carved, hit) = engine.integrate_ray(Point3::ZERO, Point3::new(0.0, 0.5, 0.0));
        assert_eq!((carved, hit), (5, true));

        let (carved, hit) = engine.integrate_ray(Point3::ZERO, Point3::new(0.0, 50.0, 0.0));
        assert_eq!((carved, hit), (0, false));
    }
}
