//! Configuration loading for VayuGrid.
//!
//! Loads all configuration from a single TOML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vayu_grid::config::VayuConfig;
//!
//! // Load from default path (configs/vayu.toml)
//! let config = VayuConfig::load_default()?;
//!
//! // Convert to the runtime config
//! let map_config = config.to_map_config();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`GridSection`] | Voxel size, origin, dimensions |
//! | [`SensorSection`] | Range window, mount offset |
//! | `log_odds` | Hit/miss increments, clamping, thresholds |
//! | [`StorageSection`] | Change history, update throttle, worker |
//!
//! ## Example TOML
//!
//! ```toml
//! [grid]
//! voxel_size = 0.1            # 10cm voxels
//! origin = [-5.0, -5.0, 0.0]
//! dimensions = [100, 100, 40]
//!
//! [sensor]
//! range_max = 20.0
//! mount_offset = [0.05, 0.0, -0.02]
//!
//! [log_odds]
//! l_hit = 85
//! l_miss = -40
//! ```

pub(crate) mod defaults;
mod sections;
mod vayu;

pub use sections::{GridSection, SensorSection, StorageSection};
pub use vayu::VayuConfig;
