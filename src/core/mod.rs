//! Core types for the VayuGrid library.
//!
//! World frame convention is whatever frame the caller supplies poses in; the
//! grid origin and extent are expressed in that same frame.
//!
//! ## Type Categories
//!
//! ### Coordinates
//! - [`Point3`]: Floating-point world/sensor coordinates in meters
//! - [`VoxelCoord`]: Integer voxel indices
//! - [`ChunkKey`]: Integer chunk indices
//!
//! ### Platform State
//! - [`Quaternion`]: Orientation, body → world
//! - [`Pose`]: Validated orientation + origin for one frame
//!
//! ### Sensor Input
//! - [`RangeSample`]: One range along a fixed sensor direction
//! - [`Frame`]: Timestamped set of samples

mod frame;
mod point;
mod pose;
mod quaternion;

pub use frame::{Frame, RangeSample};
pub use point::{ChunkKey, Point3, VoxelCoord};
pub use pose::{Pose, UNIT_NORM_TOLERANCE};
pub use quaternion::Quaternion;
