//! # VayuGrid
//!
//! 3D occupancy mapping for moving aerial platforms.
//!
//! ## Overview
//!
//! VayuGrid turns per-frame range data plus the platform pose into a
//! probabilistic voxel volume that obstacle-avoidance code can read while new
//! frames are still being fused:
//!
//! - **Geometry transform**: sensor samples → world points
//! - **Fusion**: log-odds hits at endpoints, misses along each ray
//! - **Snapshots**: immutable, versioned views published without blocking
//!   the writer or the readers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vayu_grid::{Coordinator, Frame, MapConfig, Point3, Quaternion};
//!
//! let coordinator = Coordinator::new(MapConfig::default())?;
//!
//! let frame = Frame::from_points(timestamp_ns, &sensor_points);
//! let report = coordinator.process_frame(&frame, orientation, position)?;
//!
//! if let Some(snapshot) = coordinator.latest_snapshot() {
//!     let blocked = snapshot.is_occupied(snapshot.layout().world_to_voxel(target));
//! }
//! ```
//!
//! ## Coordinate System
//!
//! - Poses and the grid share one world frame chosen by the caller
//! - Orientation is a Hamilton quaternion rotating body → world
//! - Voxel (0, 0, 0) has its minimum corner at the grid origin

#![warn(missing_docs)]

// Core types
pub mod core;

// Error types
pub mod error;

// Sensor → world transform
pub mod geometry;

// Voxel volume, fusion and snapshots
pub mod grid;

// Snapshot publication and consumer storage
pub mod storage;

// Frame entry point and background worker
pub mod coordinator;

// TOML configuration
pub mod config;

// Re-export commonly used types
pub use crate::core::{ChunkKey, Frame, Point3, Pose, Quaternion, RangeSample, VoxelCoord};

pub use error::{ConfigError, FrameError, Result};

pub use geometry::{PointClass, TransformedFrame, WorldPoint, transform_frame};

pub use grid::{
    FusionEngine, FusionStats, GridConfig, GridLayout, LogOddsConfig, MapConfig, SensorConfig,
    Voxel, VoxelCounts, VoxelSnapshot, VoxelState,
};

pub use storage::{ChunkStore, SnapshotBuffer, StorageCore};

pub use coordinator::{
    Coordinator, CoordinatorState, FrameReport, FrameWorker, SubmitOutcome, UpdateThrottle,
    WorkerStats, shared_instance,
};

pub use config::VayuConfig;
