//! Acquisition types shared by the reader and the session.

use crate::sensors::types::{Axis, SensorError, SensorKind};
use crate::specimen::SinkError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One reference reading taken by the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceReading {
    pub height: f64,
    pub length: f64,
    /// When the reading was taken
    pub acquired_at: DateTime<Utc>,
}

impl ReferenceReading {
    /// Create a reading stamped with the current time.
    pub fn new(height: f64, length: f64) -> Self {
        Self {
            height,
            length,
            acquired_at: Utc::now(),
        }
    }
}

/// Derived per-axis distances from an axis-sampling sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisReadings {
    pub height: f64,
    pub length: f64,
    pub depth: f64,
}

impl AxisReadings {
    /// Value for one axis.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Height => self.height,
            Axis::Length => self.length,
            Axis::Depth => self.depth,
        }
    }

    /// Set the value for one axis.
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Height => self.height = value,
            Axis::Length => self.length = value,
            Axis::Depth => self.depth = value,
        }
    }
}

/// Sample counts captured per axis during a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCounts {
    pub height: usize,
    pub length: usize,
    pub depth: usize,
}

impl SampleCounts {
    /// Count for one axis.
    pub fn get(&self, axis: Axis) -> usize {
        match axis {
            Axis::Height => self.height,
            Axis::Length => self.length,
            Axis::Depth => self.depth,
        }
    }

    pub(crate) fn set(&mut self, axis: Axis, count: usize) {
        match axis {
            Axis::Height => self.height = count,
            Axis::Length => self.length = count,
            Axis::Depth => self.depth = count,
        }
    }
}

/// Where a reader is within its acquisition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleState {
    /// No cycle running
    #[default]
    Idle,
    /// Sensor is being started
    Initializing,
    /// Capturing one axis
    Sampling(Axis),
    /// Deriving values and pushing them to the sink
    Finalizing,
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleState::Idle => write!(f, "idle"),
            CycleState::Initializing => write!(f, "initializing"),
            CycleState::Sampling(axis) => write!(f, "sampling({})", axis),
            CycleState::Finalizing => write!(f, "finalizing"),
        }
    }
}

/// Outcome of one completed acquisition cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    /// Sensor that ran the cycle
    pub sensor: SensorKind,
    /// Derived distances, for axis-sampling sensors
    pub readings: Option<AxisReadings>,
    /// Reference values, for reference sensors
    pub reference: Option<ReferenceReading>,
    /// Samples captured per axis
    pub sample_counts: SampleCounts,
    /// When the cycle completed
    pub completed_at: DateTime<Utc>,
}

/// Errors from the reader.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Precision requested before both reading sets exist
    #[error("Precision needs both a laser and a reference reading set")]
    IncompletePrecisionInput,

    /// Sensor or acquisition failure
    #[error(transparent)]
    Sensor(#[from] SensorError),

    /// Measurement sink rejected a value
    #[error("Sink rejected value: {0}")]
    Sink(#[from] SinkError),

    /// Measurement sink lock was poisoned
    #[error("Sink unavailable: {0}")]
    SinkUnavailable(String),
}
