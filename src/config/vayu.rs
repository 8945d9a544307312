//! Main VayuConfig and conversion methods.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::defaults;
use super::sections::{GridSection, SensorSection, StorageSection};
use crate::error::ConfigError;
use crate::grid::{LogOddsConfig, MapConfig};

/// Full VayuGrid configuration loaded from TOML
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VayuConfig {
    /// Grid geometry
    #[serde(default)]
    pub grid: GridSection,

    /// Sensor range window and mounting
    #[serde(default)]
    pub sensor: SensorSection,

    /// Log-odds update parameters
    #[serde(default)]
    pub log_odds: LogOddsConfig,

    /// Storage history and worker settings
    #[serde(default)]
    pub storage: StorageSection,
}

impl VayuConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        info!("[Config] loaded {}", path.display());
        Ok(config)
    }

    /// Load from the default config path (configs/vayu.toml), or defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new(defaults::CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_map_config().validate()?;
        if self.storage.history_len == 0 {
            return Err(ConfigError::Invalid(
                "storage.history_len must be at least 1".into(),
            ));
        }
        if self.storage.max_drop_trigger == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_drop_trigger must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Convert to the runtime map config
    pub fn to_map_config(&self) -> MapConfig {
        MapConfig {
            grid: self.grid.to_grid_config(),
            sensor: self.sensor.to_sensor_config(),
            log_odds: self.log_odds.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = VayuConfig::default();
        assert_eq!(config.grid.voxel_size, 0.1);
        assert_eq!(config.grid.dimensions, [100, 100, 100]);
        assert_eq!(config.storage.history_len, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = VayuConfig::default();
        let toml = config.to_toml().unwrap();
        let parsed = VayuConfig::from_toml(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml() {
        let config = VayuConfig::from_toml(
            r#"
            [grid]
            voxel_size = 0.2

            [log_odds]
            l_hit = 70
            "#,
        )
        .unwrap();

        assert_eq!(config.grid.voxel_size, 0.2);
        assert_eq!(config.grid.dimensions, [100, 100, 100]);
        assert_eq!(config.log_odds.l_hit, 70);
        assert_eq!(config.log_odds.l_miss, -40);
        assert_eq!(config.sensor.range_max, 20.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = VayuConfig::from_toml("[grid]\nvoxel_size = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = VayuConfig::from_toml("[storage]\nhistory_len = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = VayuConfig::from_toml("[grid]\ndimensions = [536870912, 536870912, 536870912]\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = VayuConfig::from_toml("[grid]\nvoxel_size = \"big\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sensor]\nrange_max = 12.5\nmount_offset = [0.1, 0.0, -0.05]").unwrap();

        let config = VayuConfig::load(file.path()).unwrap();
        assert_eq!(config.sensor.range_max, 12.5);
        assert_eq!(config.to_map_config().sensor.mount_offset.z, -0.05);
    }

    #[test]
    fn test_load_missing_file() {
        let err = VayuConfig::load(Path::new("/nonexistent/vayu.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
