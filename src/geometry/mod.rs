//! Geometry transform: sensor samples to world points.
//!
//! Pure functions; the only failure mode (an invalid pose) is caught when the
//! [`Pose`](crate::core::Pose) is built, before anything here runs.

pub mod transform;

pub use transform::{PointClass, TransformedFrame, WorldPoint, transform_frame};
