//! TOML section types.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::core::Point3;
use crate::grid::{GridConfig, SensorConfig};

/// `[grid]`: volume geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSection {
    /// Voxel edge length in meters
    #[serde(default = "defaults::voxel_size")]
    pub voxel_size: f32,

    /// World position of the grid's minimum corner
    #[serde(default = "defaults::origin")]
    pub origin: [f32; 3],

    /// Voxels along X, Y, Z
    #[serde(default = "defaults::dimensions")]
    pub dimensions: [u32; 3],
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            voxel_size: defaults::voxel_size(),
            origin: defaults::origin(),
            dimensions: defaults::dimensions(),
        }
    }
}

impl GridSection {
    /// Convert to the runtime grid config.
    pub fn to_grid_config(&self) -> GridConfig {
        GridConfig {
            voxel_size: self.voxel_size,
            origin: Point3::from_array(self.origin),
            dimensions: self.dimensions,
        }
    }
}

/// `[sensor]`: range window and mounting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorSection {
    /// Ranges at or below this are ignored
    #[serde(default = "defaults::range_min")]
    pub range_min: f32,

    /// Ranges above this are ignored
    #[serde(default = "defaults::range_max")]
    pub range_max: f32,

    /// Sensor position in the body frame
    #[serde(default = "defaults::mount_offset")]
    pub mount_offset: [f32; 3],
}

impl Default for SensorSection {
    fn default() -> Self {
        Self {
            range_min: defaults::range_min(),
            range_max: defaults::range_max(),
            mount_offset: defaults::mount_offset(),
        }
    }
}

impl SensorSection {
    /// Convert to the runtime sensor config.
    pub fn to_sensor_config(&self) -> SensorConfig {
        SensorConfig {
            range_min: self.range_min,
            range_max: self.range_max,
            mount_offset: Point3::from_array(self.mount_offset),
        }
    }
}

/// `[storage]`: consumer-side history and worker throttling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Change sets retained by `ChunkStore`
    #[serde(default = "defaults::history_len")]
    pub history_len: usize,

    /// Largest interval (in frames) between storage updates under load
    #[serde(default = "defaults::max_drop_trigger")]
    pub max_drop_trigger: u32,

    /// Name of the background fusion thread
    #[serde(default = "defaults::worker_name")]
    pub worker_name: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            history_len: defaults::history_len(),
            max_drop_trigger: defaults::max_drop_trigger(),
            worker_name: defaults::worker_name(),
        }
    }
}
