//! Sensor → world transform for one frame.
//!
//! ```text
//! p_sensor = direction * range
//! p_body   = p_sensor + mount_offset
//! p_world  = q ⊗ p_body ⊗ q* + origin
//! ```
//!
//! Invalid samples (non-finite range, outside the sensor range window,
//! degenerate direction) are counted and skipped. World points that fall
//! outside the grid are kept but tagged [`PointClass::OutOfExtent`] so the
//! fusion step can drop them together with their ray.

use crate::core::{Frame, Point3, Pose, VoxelCoord};
use crate::grid::{GridLayout, SensorConfig};

/// Where a transformed point landed relative to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointClass {
    /// Inside the grid extent; the voxel receives a hit.
    Hit,
    /// Outside the grid; neither hit nor ray is applied.
    OutOfExtent,
}

/// One range sample expressed in the world frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPoint {
    /// World position in meters.
    pub position: Point3,
    /// Voxel containing `position` (may be outside the grid).
    pub voxel: VoxelCoord,
    /// Extent classification.
    pub class: PointClass,
}

/// A frame after the geometry transform.
#[derive(Clone, Debug, Default)]
pub struct TransformedFrame {
    /// Timestamp carried over from the frame.
    pub timestamp_ns: u64,
    /// World position of the sensor; every ray starts here.
    pub ray_origin: Point3,
    /// Valid samples in the world frame.
    pub points: Vec<WorldPoint>,
    /// Samples skipped as invalid.
    pub invalid_samples: usize,
}

impl TransformedFrame {
    /// Points inside the grid.
    pub fn hits(&self) -> impl Iterator<Item = &WorldPoint> {
        self.points.iter().filter(|p| p.class == PointClass::Hit)
    }

    /// Number of points outside the grid.
    pub fn out_of_extent(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.class == PointClass::OutOfExtent)
            .count()
    }

    /// No point can change the grid.
    pub fn is_empty(&self) -> bool {
        self.hits().next().is_none()
    }
}

/// Transform every valid sample of `frame` into the world frame.
pub fn transform_frame(
    frame: &Frame,
    pose: &Pose,
    sensor: &SensorConfig,
    layout: &GridLayout,
) -> TransformedFrame {
    let ray_origin = pose.transform_point(sensor.mount_offset);
    let mut points = Vec::with_capacity(frame.len());
    let mut invalid_samples = 0;

    for sample in &frame.samples {
        if !sample.has_direction() || !sensor.is_valid_range(sample.range) {
            invalid_samples += 1;
            continue;
        }

        let body = sample.to_sensor_point() + sensor.mount_offset;
        let position = pose.transform_point(body);
        if !position.is_finite() {
            invalid_samples += 1;
            continue;
        }

        let voxel = layout.world_to_voxel(position);
        let class = if layout.contains_voxel(voxel) {
            PointClass::Hit
        } else {
            PointClass::OutOfExtent
        };

        points.push(WorldPoint {
            position,
            voxel,
            class,
        });
    }

    TransformedFrame {
        timestamp_ns: frame.timestamp_ns,
        ray_origin,
        points,
        invalid_samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Quaternion, RangeSample};
    use crate::grid::GridConfig;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn layout() -> GridLayout {
        GridLayout::new(&GridConfig::default())
    }

    #[test]
    fn test_identity_pose() {
        let frame = Frame::from_points(5, &[Point3::new(1.0, 0.0, 0.0)]);
        let out = transform_frame(
            &frame,
            &Pose::identity(),
            &SensorConfig::default(),
            &layout(),
        );

        assert_eq!(out.timestamp_ns, 5);
        assert_eq!(out.ray_origin, Point3::ZERO);
        assert_eq!(out.points.len(), 1);
        assert_eq!(out.points[0].voxel, VoxelCoord::new(10, 0, 0));
        assert_eq!(out.points[0].class, PointClass::Hit);
        assert_eq!(out.invalid_samples, 0);
    }

    #[test]
    fn test_rotation_translation_and_mount() {
        // Yaw 90°: sensor +X points along world +Y
        let q = Quaternion::from_axis_angle(Point3::new(0.0, 0.0, 1.0), FRAC_PI_2);
        let pose = Pose::new(q, Point3::new(5.0, 5.0, 2.0)).unwrap();
        let sensor = SensorConfig {
            mount_offset: Point3::new(0.2, 0.0, 0.1),
            ..Default::default()
        };
        let frame = Frame::new(0, vec![RangeSample::new(Point3::new(1.0, 0.0, 0.0), 2.0)]);

        let out = transform_frame(&frame, &pose, &sensor, &layout());

        assert_relative_eq!(out.ray_origin.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(out.ray_origin.y, 5.2, epsilon = 1e-5);
        assert_relative_eq!(out.ray_origin.z, 2.1, epsilon = 1e-5);

        let p = out.points[0].position;
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 7.2, epsilon = 1e-5);
        assert_relative_eq!(p.z, 2.1, epsilon = 1e-5);
    }

    #[test]
    fn test_invalid_samples_skipped() {
        let frame = Frame::new(
            0,
            vec![
                RangeSample::invalid(Point3::new(1.0, 0.0, 0.0)),
                RangeSample::new(Point3::new(1.0, 0.0, 0.0), f32::INFINITY),
                RangeSample::new(Point3::new(1.0, 0.0, 0.0), 0.0),
                RangeSample::new(Point3::new(1.0, 0.0, 0.0), 25.0),
                RangeSample::new(Point3::ZERO, 1.0),
                RangeSample::new(Point3::new(0.0, 1.0, 0.0), 1.0),
            ],
        );
        let out = transform_frame(
            &frame,
            &Pose::identity(),
            &SensorConfig::default(),
            &layout(),
        );

        assert_eq!(out.invalid_samples, 5);
        assert_eq!(out.points.len(), 1);
    }

    #[test]
    fn test_out_of_extent_tagged() {
        let frame = Frame::from_points(
            0,
            &[
                Point3::new(15.0, 0.0, 0.0),
                Point3::new(-1.0, 0.0, 0.0),
                Point3::new(2.0, 2.0, 2.0),
            ],
        );
        let out = transform_frame(
            &frame,
            &Pose::identity(),
            &SensorConfig::default(),
            &layout(),
        );

        assert_eq!(out.points.len(), 3);
        assert_eq!(out.out_of_extent(), 2);
        assert_eq!(out.hits().count(), 1);
        assert!(!out.is_empty());
    }
}
