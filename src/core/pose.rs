//! Platform pose.

use super::point::Point3;
use super::quaternion::Quaternion;
use crate::error::{FrameError, Result};

/// Tolerance on the unit-norm invariant of [`Pose::orientation`].
pub const UNIT_NORM_TOLERANCE: f32 = 1e-4;

/// Platform orientation and world-frame position for one frame.
///
/// Can only be built through [`Pose::new`] / [`Pose::from_raw`], which
/// guarantees a unit orientation and a finite origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    orientation: Quaternion,
    origin: Point3,
}

impl Pose {
    /// Validate and build a pose. The orientation is normalized.
    pub fn new(orientation: Quaternion, origin: Point3) -> Result<Self> {
        let orientation = orientation.normalized().ok_or_else(|| {
            FrameError::InvalidPose(format!(
                "orientation [{}, {}, {}, {}] cannot be normalized",
                orientation.w, orientation.x, orientation.y, orientation.z
            ))
        })?;

        if !origin.is_finite() {
            return Err(FrameError::InvalidPose(format!(
                "origin ({}, {}, {}) is not finite",
                origin.x, origin.y, origin.z
            )));
        }

        Ok(Self {
            orientation,
            origin,
        })
    }

    /// Build from raw telemetry arrays: `[w, x, y, z]` and `[x, y, z]`.
    pub fn from_raw(quaternion: [f32; 4], origin: [f32; 3]) -> Result<Self> {
        Self::new(Quaternion::from_wxyz(quaternion), Point3::from_array(origin))
    }

    /// Identity pose at the world origin.
    pub fn identity() -> Self {
        Self {
            orientation: Quaternion::identity(),
            origin: Point3::ZERO,
        }
    }

    /// Unit orientation quaternion.
    #[inline]
    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    /// World-frame position.
    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Transform a body-frame point into the world frame.
    #[inline]
    pub fn transform_point(&self, body: Point3) -> Point3 {
        self.orientation.rotate(body) + self.origin
    }
}
