//! Rig configuration loaded from TOML.
//!
//! A missing file yields the defaults; a file only needs the sections it
//! overrides.

use crate::sensors::types::{RangePolicy, MAX_RANGE, NOMINAL_REFERENCE_SPEED};
use crate::input::console::DEFAULT_MAX_ATTEMPTS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Laser settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserSettings {
    /// Channel identifier, `COM<n>` or `/dev/tty<name>`
    pub channel: String,
    /// Slider speed in distance units per poll
    pub nominal_speed: f64,
}

impl Default for LaserSettings {
    fn default() -> Self {
        Self {
            channel: default_channel(0),
            nominal_speed: NOMINAL_REFERENCE_SPEED,
        }
    }
}

/// Camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub channel: String,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            channel: default_channel(1),
        }
    }
}

/// Accepted measurement range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeSettings {
    pub max: f64,
    /// When false only negative values are rejected
    pub reject_above_max: bool,
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            max: MAX_RANGE,
            reject_above_max: true,
        }
    }
}

impl RangeSettings {
    pub fn policy(&self) -> RangePolicy {
        if self.reject_above_max {
            RangePolicy {
                max: self.max,
                reject_above_max: true,
            }
        } else {
            RangePolicy::non_negative()
        }
    }
}

/// Console input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Attempts per prompt before giving up
    pub max_attempts: u32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Specimen being measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecimenSettings {
    pub collection_site: String,
    pub collection_type: String,
    pub anatomical_site: String,
}

impl Default for SpecimenSettings {
    fn default() -> Self {
        Self {
            collection_site: "Laboratory".to_string(),
            collection_type: "Biopsy".to_string(),
            anatomical_site: "Unspecified".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Rig configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub laser: LaserSettings,
    pub camera: CameraSettings,
    pub range: RangeSettings,
    pub input: InputSettings,
    pub specimen: SpecimenSettings,
    pub logging: LoggingSettings,
}

impl RigConfig {
    /// Reject values no rig could run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.range.max;
        if self.range.reject_above_max && !(max.is_finite() && max >= 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "range.max must be a non-negative number, got {}",
                max
            )));
        }
        if !(self.laser.nominal_speed.is_finite() && self.laser.nominal_speed > 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "laser.nominal_speed must be positive, got {}",
                self.laser.nominal_speed
            )));
        }
        Ok(())
    }
}

#[cfg(windows)]
fn default_channel(index: u32) -> String {
    format!("COM{}", index + 1)
}

#[cfg(not(windows))]
fn default_channel(index: u32) -> String {
    format!("/dev/ttyUSB{}", index)
}

/// Get the data directory for the rig.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "specimenrig", "SpecimenRig")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load configuration from the default location.
pub fn load_config() -> Result<RigConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load configuration from a file, falling back to defaults if it is missing.
pub fn load_config_from(path: &Path) -> Result<RigConfig, ConfigError> {
    if !path.exists() {
        tracing::info!("No config at {}, using defaults", path.display());
        return Ok(RigConfig::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let config: RigConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Save configuration to a file.
pub fn save_config_to(config: &RigConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
