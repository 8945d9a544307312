//! 3D occupancy volume and frame fusion.
//!
//! The working volume is a dense, chunked grid of log-odds voxels. Only the
//! fusion engine writes to it; consumers read immutable snapshots that share
//! unchanged chunks with the working volume.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │    TransformedFrame      │   world points tagged Hit / OutOfExtent
//! └────────────┬─────────────┘
//!              ▼
//! ┌──────────────────────────┐
//! │      FusionEngine        │   hit set + DDA free set, one update per voxel
//! └────────────┬─────────────┘
//!              ▼
//! ┌──────────────────────────┐
//! │      VoxelVolume         │   Vec<Arc<Chunk>>, copy-on-write
//! └────────────┬─────────────┘
//!              ▼ freeze (pointer copy)
//! ┌──────────────────────────┐
//! │     VoxelSnapshot        │   immutable, versioned
//! └──────────────────────────┘
//! ```
//!
//! ## Key Components
//!
//! - [`GridLayout`]: voxel/world conversion and chunk addressing
//! - [`Chunk`]: 16³ voxels in SoA layout
//! - [`VoxelVolume`]: the working grid
//! - [`VoxelSnapshot`]: read-only published grid
//! - [`FusionEngine`]: per-frame hit/miss application
//! - [`traversal`]: 6-connected voxel traversal for carving
//!
//! ## Log-Odds Model
//!
//! ```text
//! L(x) = log(P(x) / (1 - P(x)))             stored ×100 as i16
//! L_new = clamp(L_old + L_obs, l_min, l_max)
//!
//! Thresholds (defaults):
//!   L >  50 → Occupied
//!   L < -50 → Free
//!   else    → Uncertain (Unknown if never observed)
//! ```

pub mod chunk;
pub mod config;
pub mod fusion;
pub mod layout;
pub mod snapshot;
pub mod traversal;
pub mod volume;

pub use chunk::{Chunk, Voxel, VoxelCounts, VoxelState};
pub use config::{
    GridConfig, LogOddsConfig, MapConfig, SensorConfig, log_odds_to_probability,
    probability_to_log_odds,
};
pub use fusion::{FusionEngine, FusionStats};
pub use layout::{CHUNK_SIZE, CHUNK_VOLUME, GridLayout, MAX_CHUNKS};
pub use snapshot::VoxelSnapshot;
pub use traversal::{VoxelRay, clip_segment, voxels_along_ray};
pub use volume::VoxelVolume;
