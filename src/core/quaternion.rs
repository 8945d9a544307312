//! Orientation quaternion.

use serde::{Deserialize, Serialize};

use super::point::Point3;

/// Norms below this cannot be normalized.
const MIN_NORM: f32 = 1e-6;

/// Quaternion representation [w, x, y, z] (Hamilton convention).
///
/// Rotates body-frame vectors into the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// Scalar part
    pub w: f32,
    /// X component of the vector part
    pub x: f32,
    /// Y component of the vector part
    pub y: f32,
    /// Z component of the vector part
    pub z: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    /// Create a quaternion from its components.
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Create identity quaternion (no rotation).
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Build from a `[w, x, y, z]` array as delivered by flight telemetry.
    pub fn from_wxyz(q: [f32; 4]) -> Self {
        Self::new(q[0], q[1], q[2], q[3])
    }

    /// Rotation of `angle` radians around `axis`.
    ///
    /// A degenerate axis yields the identity.
    pub fn from_axis_angle(axis: Point3, angle: f32) -> Self {
        match axis.normalized() {
            Some(a) => {
                let (s, c) = (angle * 0.5).sin_cos();
                Self::new(c, a.x * s, a.y * s, a.z * s)
            }
            None => Self::identity(),
        }
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f32 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit quaternion, or `None` if the components are not finite or the norm
    /// is too small to divide by.
    pub fn normalized(&self) -> Option<Self> {
        let norm = self.norm();
        if !norm.is_finite() || norm < MIN_NORM {
            return None;
        }
        Some(Self::new(
            self.w / norm,
            self.x / norm,
            self.y / norm,
            self.z / norm,
        ))
    }

    /// Rotate a vector: `q * v * q^-1`. Assumes a unit quaternion.
    #[inline]
    pub fn rotate(&self, v: Point3) -> Point3 {
        // v' = v + 2w(u x v) + 2u x (u x v), u = (x, y, z)
        let u = Point3::new(self.x, self.y, self.z);
        let t = u.cross(&v) * 2.0;
        v + t * self.w + u.cross(&t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_rotation() {
        let v = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Quaternion::identity().rotate(v), v);
    }

    #[test]
    fn test_yaw_rotation() {
        let q = Quaternion::from_axis_angle(Point3::new(0.0, 0.0, 1.0), FRAC_PI_2);
        let r = q.rotate(Point3::new(1.0, 0.0, 0.0));

        assert_relative_eq!(r.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(r.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let q = Quaternion::new(0.3, -0.5, 0.7, 0.1).normalized().unwrap();
        let v = Point3::new(-2.0, 0.5, 4.0);
        assert_relative_eq!(q.rotate(v).length(), v.length(), epsilon = 1e-5);
    }

    #[test]
    fn test_normalize() {
        let q = Quaternion::new(2.0, 0.0, 0.0, 0.0).normalized().unwrap();
        assert_eq!(q, Quaternion::identity());

        assert!(Quaternion::new(0.0, 0.0, 0.0, 0.0).normalized().is_none());
        assert!(Quaternion::new(f32::NAN, 1.0, 0.0, 0.0).normalized().is_none());
        assert!(
            Quaternion::new(f32::INFINITY, 0.0, 0.0, 0.0)
                .normalized()
                .is_none()
        );
    }
}
