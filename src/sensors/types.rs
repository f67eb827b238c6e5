//! Sensor types and enums for the measurement rig.
//!
//! Axes, sensor kinds, lifecycle status, channel identifiers and the
//! range policy shared by every component that accepts raw readings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Nominal slider speed in distance-units per time-unit.
pub const NOMINAL_REFERENCE_SPEED: f64 = 0.05;

/// Declared maximum range of the rig in distance-units.
pub const MAX_RANGE: f64 = 500.0;

/// Measurement axis of a specimen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Vertical extent
    Height,
    /// Longitudinal extent
    Length,
    /// Transverse extent
    Depth,
}

impl Axis {
    /// Capture order used by the laser: height, then length, then depth.
    pub const ALL: [Axis; 3] = [Axis::Height, Axis::Length, Axis::Depth];

    /// Lowercase name as used in prompts and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Axis::Height => "height",
            Axis::Length => "length",
            Axis::Depth => "depth",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Axis {
    type Err = SensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "height" => Ok(Axis::Height),
            "length" => Ok(Axis::Length),
            "depth" => Ok(Axis::Depth),
            _ => Err(SensorError::InvalidAxis(s.to_string())),
        }
    }
}

/// Kind of sensor device mounted on the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Distance sensor that accumulates detection samples
    Laser,
    /// Vision sensor providing reference height and length
    Camera,
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorKind::Laser => write!(f, "Laser"),
            SensorKind::Camera => write!(f, "Camera"),
        }
    }
}

/// Lifecycle status of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SensorStatus {
    /// Never calibrated or reset since last use
    #[default]
    Uninitialized,
    /// Calibrated but not started
    Calibrated,
    /// Started, no detection window open
    Active,
    /// Detection window open
    Detecting,
    /// Terminated after a cycle
    Idle,
}

impl std::fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorStatus::Uninitialized => write!(f, "Uninitialized"),
            SensorStatus::Calibrated => write!(f, "Calibrated"),
            SensorStatus::Active => write!(f, "Active"),
            SensorStatus::Detecting => write!(f, "Detecting"),
            SensorStatus::Idle => write!(f, "Idle"),
        }
    }
}

/// Lifecycle flags every sensor carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleFlags {
    /// Set by calibration, cleared by reset
    pub calibrated: bool,
    /// Toggled by init/terminate
    pub active: bool,
    /// Set once a terminate has run
    pub terminated: bool,
}

impl LifecycleFlags {
    /// Status snapshot, given whether a detection window is open.
    pub fn status(&self, detecting: bool) -> SensorStatus {
        match (self.active, detecting) {
            (true, true) => SensorStatus::Detecting,
            (true, false) => SensorStatus::Active,
            (false, _) if self.terminated => SensorStatus::Idle,
            (false, _) if self.calibrated => SensorStatus::Calibrated,
            (false, _) => SensorStatus::Uninitialized,
        }
    }
}

/// Physical channel a sensor is bound to.
///
/// Accepted formats are `COM<digits>` (Windows) and `/dev/tty<word-chars>`
/// (Unix). The identifier never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChannelId(String);

impl ChannelId {
    /// Validate and wrap a channel identifier.
    pub fn parse(raw: &str) -> Result<Self, SensorError> {
        if raw.trim().is_empty() {
            return Err(SensorError::Configuration(
                "channel identifier cannot be empty".to_string(),
            ));
        }

        if Self::is_windows_port(raw) || Self::is_unix_tty(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(SensorError::Configuration(format!(
                "invalid channel identifier format: {}",
                raw
            )))
        }
    }

    /// The identifier as given at construction.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_windows_port(raw: &str) -> bool {
        raw.strip_prefix("COM")
            .map_or(false, |n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    }

    fn is_unix_tty(raw: &str) -> bool {
        raw.strip_prefix("/dev/tty").map_or(false, |name| {
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChannelId {
    type Err = SensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Accepted range for raw readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangePolicy {
    /// Upper bound of the device range
    pub max: f64,
    /// Reject values above `max`; when false only negatives are rejected
    pub reject_above_max: bool,
}

impl Default for RangePolicy {
    fn default() -> Self {
        Self {
            max: MAX_RANGE,
            reject_above_max: true,
        }
    }
}

impl RangePolicy {
    /// Legacy policy that only rejects negative values.
    pub fn non_negative() -> Self {
        Self {
            max: f64::INFINITY,
            reject_above_max: false,
        }
    }

    /// Check a raw value; out-of-range values are rejected, never clamped.
    pub fn check(&self, value: f64) -> Result<f64, SensorError> {
        let in_range = value.is_finite()
            && value >= 0.0
            && (!self.reject_above_max || value <= self.max);

        if in_range {
            Ok(value)
        } else {
            Err(SensorError::OutOfRange {
                value,
                max: self.max,
            })
        }
    }

    /// Upper bound to advertise to an input provider.
    pub fn upper_bound(&self) -> f64 {
        if self.reject_above_max {
            self.max
        } else {
            f64::INFINITY
        }
    }
}

/// Errors that can occur at the sensor boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    /// Malformed channel identifier, fatal to construction
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unrecognized axis name
    #[error("Invalid axis: {0}")]
    InvalidAxis(String),

    /// Raw value outside the accepted range
    #[error("Measurement {value} {}", range_text(.max))]
    OutOfRange { value: f64, max: f64 },

    /// Detection window length is not a non-negative whole number
    #[error("Invalid detection window length: {0}")]
    InvalidWindow(f64),

    /// The input provider cancelled the acquisition step
    #[error("Acquisition cancelled by input provider")]
    Cancelled,

    /// The input provider failed
    #[error("Input error: {0}")]
    Input(String),
}

fn range_text(max: &f64) -> String {
    if max.is_finite() {
        format!("out of range [0, {}]", max)
    } else {
        "must not be negative".to_string()
    }
}
