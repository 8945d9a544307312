//! Range frame input.
//!
//! A [`Frame`] is what the frame source hands over after decoding one depth
//! image or scan: a timestamp and a list of range samples in the sensor frame.
//! Each sample carries the fixed viewing direction of its pixel/beam and the
//! measured range along it.
//!
//! ```text
//!            +Z (up)
//!             │   ● sample = direction * range
//!             │  ╱
//!             │ ╱  elevation
//!             │╱________ +X (forward)
//!            ╱  azimuth
//!          +Y (left)
//! ```

use super::point::Point3;

/// One range measurement along a fixed sensor-frame direction.
///
/// Invalid returns (no echo, saturated pixel) are carried as non-finite ranges
/// and skipped during the transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeSample {
    /// Unit viewing direction in the sensor frame (zero if degenerate).
    pub direction: Point3,
    /// Measured range in meters.
    pub range: f32,
}

impl RangeSample {
    /// Create a sample; the direction is normalized.
    pub fn new(direction: Point3, range: f32) -> Self {
        Self {
            direction: direction.normalized().unwrap_or(Point3::ZERO),
            range,
        }
    }

    /// Create a sample from spherical angles (radians).
    ///
    /// Azimuth is counter-clockwise from +X around +Z, elevation is measured
    /// up from the XY plane.
    pub fn from_angles(azimuth: f32, elevation: f32, range: f32) -> Self {
        let (sin_az, cos_az) = azimuth.sin_cos();
        let (sin_el, cos_el) = elevation.sin_cos();
        Self {
            direction: Point3::new(cos_el * cos_az, cos_el * sin_az, sin_el),
            range,
        }
    }

    /// A sample the sensor flagged as having no valid return.
    pub fn invalid(direction: Point3) -> Self {
        Self::new(direction, f32::NAN)
    }

    /// Direction is usable.
    #[inline]
    pub fn has_direction(&self) -> bool {
        self.direction.is_finite() && self.direction.length() > 0.5
    }

    /// Point in the sensor frame.
    #[inline]
    pub fn to_sensor_point(&self) -> Point3 {
        self.direction * self.range
    }
}

/// A decoded range frame.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /// Monotonic capture time in nanoseconds.
    pub timestamp_ns: u64,
    /// Samples in the sensor frame.
    pub samples: Vec<RangeSample>,
}

impl Frame {
    /// Create a frame from samples.
    pub fn new(timestamp_ns: u64, samples: Vec<RangeSample>) -> Self {
        Self {
            timestamp_ns,
            samples,
        }
    }

    /// Create a frame from sensor-frame cartesian points.
    pub fn from_points(timestamp_ns: u64, points: &[Point3]) -> Self {
        let samples = points
            .iter()
            .map(|p| RangeSample::new(*p, p.length()))
            .collect();
        Self::new(timestamp_ns, samples)
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Frame has no samples at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_from_angles() {
        let s = RangeSample::from_angles(FRAC_PI_2, 0.0, 2.0);
        let p = s.to_sensor_point();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-6);

        let up = RangeSample::from_angles(0.0, FRAC_PI_2, 1.0).to_sensor_point();
        assert_relative_eq!(up.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_from_points() {
        let frame = Frame::from_points(7, &[Point3::new(3.0, 0.0, 4.0)]);
        assert_eq!(frame.len(), 1);
        assert_relative_eq!(frame.samples[0].range, 5.0);
        assert_relative_eq!(frame.samples[0].direction.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_direction() {
        let s = RangeSample::new(Point3::ZERO, 1.0);
        assert!(!s.has_direction());
        assert!(RangeSample::from_angles(0.3, 0.1, 1.0).has_direction());
    }
}
