//! Configuration types for the occupancy volume.

use crate::core::Point3;
use crate::error::ConfigError;
use crate::grid::layout::{CHUNK_SIZE, MAX_CHUNKS};
use serde::{Deserialize, Serialize};

/// Grid configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Voxel edge length in meters (e.g., 0.1 = 10cm voxels)
    #[serde(default = "default_voxel_size")]
    pub voxel_size: f32,

    /// World coordinates of the minimum corner of voxel (0, 0, 0)
    #[serde(default)]
    pub origin: Point3,

    /// Grid size in voxels along X, Y, Z
    #[serde(default = "default_dimensions")]
    pub dimensions: [u32; 3],
}

fn default_voxel_size() -> f32 {
    0.1
}
fn default_dimensions() -> [u32; 3] {
    [100, 100, 100]
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            voxel_size: default_voxel_size(), // 10cm voxels
            origin: Point3::ZERO,
            dimensions: default_dimensions(), // 10m cube
        }
    }
}

impl GridConfig {
    /// Number of chunks covering the grid, `None` on overflow.
    pub fn chunk_count(&self) -> Option<u64> {
        self.dimensions.iter().try_fold(1u64, |acc, &d| {
            acc.checked_mul(u64::from(d.div_ceil(CHUNK_SIZE as u32)))
        })
    }

    /// Check that the grid can be built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "voxel_size must be positive, got {}",
                self.voxel_size
            )));
        }
        if !self.origin.is_finite() {
            return Err(ConfigError::Invalid("grid origin must be finite".into()));
        }
        if self.dimensions.iter().any(|&d| d == 0 || d > i32::MAX as u32 / 2) {
            return Err(ConfigError::Invalid(format!(
                "grid dimensions out of range: {:?}",
                self.dimensions
            )));
        }
        match self.chunk_count() {
            Some(chunks) if chunks <= MAX_CHUNKS as u64 => Ok(()),
            _ => Err(ConfigError::Invalid(format!(
                "grid {:?} needs more than {} chunks",
                self.dimensions, MAX_CHUNKS
            ))),
        }
    }
}

/// Sensor configuration for frame transforms
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Ranges at or below this are discarded (meters).
    /// Zero drops only zero-length rays.
    #[serde(default)]
    pub range_min: f32,

    /// Ranges above this are discarded (meters)
    #[serde(default = "default_range_max")]
    pub range_max: f32,

    /// Sensor position in the platform body frame
    #[serde(default)]
    pub mount_offset: Point3,
}

fn default_range_max() -> f32 {
    20.0
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            range_min: 0.0,
            range_max: default_range_max(),
            mount_offset: Point3::ZERO,
        }
    }
}

impl SensorConfig {
    /// Check if a range measurement is usable
    #[inline]
    pub fn is_valid_range(&self, range: f32) -> bool {
        range.is_finite() && range > self.range_min && range <= self.range_max
    }

    /// Check that ranges and mount offset are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.range_min >= 0.0 && self.range_max > self.range_min) {
            return Err(ConfigError::Invalid(format!(
                "sensor range window [{}, {}] is empty",
                self.range_min, self.range_max
            )));
        }
        if !self.mount_offset.is_finite() {
            return Err(ConfigError::Invalid("mount_offset must be finite".into()));
        }
        Ok(())
    }
}

/// Configuration for log-odds occupancy updates.
///
/// - Log-odds: L(x) = log(P(x) / (1 - P(x)))
/// - Bayesian update: L_new = clamp(L_old + L_observation, l_min, l_max)
/// - Stored as fixed-point i16: actual = value / 100
///
/// Clamping bounds how far a voxel can saturate, so a saturated voxel needs
/// `(l_max - threshold) / |l_miss|` contradicting observations to flip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogOddsConfig {
    /// Log-odds increment for a hit (ray endpoint). P≈0.70
    #[serde(default = "default_l_hit")]
    pub l_hit: i16,

    /// Log-odds decrement for a miss (ray passes through). P≈0.40
    #[serde(default = "default_l_miss")]
    pub l_miss: i16,

    /// Threshold for considering a voxel occupied (exclusive). P > 0.62 → L > 50
    #[serde(default = "default_l_occupied")]
    pub l_occupied_threshold: i16,

    /// Threshold for considering a voxel free (exclusive). P < 0.38 → L < -50
    #[serde(default = "default_l_free")]
    pub l_free_threshold: i16,

    /// Minimum log-odds value (clamping). P ≈ 0.12
    #[serde(default = "default_l_min")]
    pub l_min: i16,

    /// Maximum log-odds value (clamping). P ≈ 0.97
    #[serde(default = "default_l_max")]
    pub l_max: i16,
}

fn default_l_hit() -> i16 {
    85
}
fn default_l_miss() -> i16 {
    -40
}
fn default_l_occupied() -> i16 {
    50
}
fn default_l_free() -> i16 {
    -50
}
fn default_l_min() -> i16 {
    -200
}
fn default_l_max() -> i16 {
    350
}

impl Default for LogOddsConfig {
    fn default() -> Self {
        Self {
            l_hit: default_l_hit(),
            l_miss: default_l_miss(),
            l_occupied_threshold: default_l_occupied(),
            l_free_threshold: default_l_free(),
            l_min: default_l_min(),
            l_max: default_l_max(),
        }
    }
}

impl LogOddsConfig {
    /// Apply one observation increment with clamping.
    #[inline]
    pub fn apply(&self, log_odds: i16, delta: i16) -> i16 {
        log_odds.saturating_add(delta).clamp(self.l_min, self.l_max)
    }

    /// Check that the update rule is monotone and bounded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.l_hit <= 0 || self.l_miss >= 0 {
            return Err(ConfigError::Invalid(format!(
                "l_hit must be > 0 and l_miss < 0, got {} / {}",
                self.l_hit, self.l_miss
            )));
        }
        if !(self.l_min < 0 && self.l_max > 0) {
            return Err(ConfigError::Invalid(format!(
                "log-odds bounds must straddle zero, got [{}, {}]",
                self.l_min, self.l_max
            )));
        }
        // Both states must be reachable under strict classification
        if !(self.l_min < self.l_free_threshold
            && self.l_free_threshold < self.l_occupied_threshold
            && self.l_occupied_threshold < self.l_max)
        {
            return Err(ConfigError::Invalid(
                "thresholds must satisfy l_min < free < occupied < l_max".into(),
            ));
        }
        Ok(())
    }
}

/// Convert log-odds (fixed-point i16) to probability.
#[inline]
pub fn log_odds_to_probability(log_odds: i16) -> f32 {
    let l = log_odds as f32 / 100.0;
    1.0 / (1.0 + (-l).exp())
}

/// Convert probability to log-odds (fixed-point i16).
#[inline]
pub fn probability_to_log_odds(p: f32) -> i16 {
    let p = p.clamp(0.01, 0.99);
    let l = (p / (1.0 - p)).ln();
    (l * 100.0).round() as i16
}

/// Full map configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Grid configuration (size, voxel size, origin)
    #[serde(default)]
    pub grid: GridConfig,
    /// Sensor configuration (range window, mounting)
    #[serde(default)]
    pub sensor: SensorConfig,
    /// Log-odds occupancy configuration
    #[serde(default)]
    pub log_odds: LogOddsConfig,
}

impl MapConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.sensor.validate()?;
        self.log_odds.validate()
    }
}
