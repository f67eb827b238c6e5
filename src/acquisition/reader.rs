//! Reader driving one sensor through an acquisition cycle.
//!
//! A cycle moves `Idle -> Initializing -> Sampling(axis)... -> Finalizing ->
//! Idle`. Everything a cycle produces is staged first and only committed to
//! the reader once every step succeeded, so an interrupted cycle leaves the
//! previous readings and timestamp in place.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::precision::mean_absolute_error;
use super::types::{
    AxisReadings, CycleReport, CycleState, ReaderError, ReferenceReading, SampleCounts,
};
use crate::input::{require, InputProvider, Prompt};
use crate::sensors::device::Sensor;
use crate::sensors::types::{Axis, RangePolicy, SensorError};
use crate::specimen::MeasurementSink;

/// Values produced by a cycle that has not been committed yet.
enum Staged {
    Axes {
        readings: AxisReadings,
        counts: SampleCounts,
    },
    Reference(ReferenceReading),
}

/// Orchestrates acquisition for one sensor bound to one measurement sink.
pub struct Reader<S: Sensor, K: MeasurementSink> {
    sensor: S,
    sink: Arc<Mutex<K>>,
    policy: RangePolicy,
    state: CycleState,
    /// Last committed derived values from this reader's sensor
    readings: Option<AxisReadings>,
    /// Last committed or adopted reference values
    reference: Option<ReferenceReading>,
    precision: Option<f64>,
    last_acquisition: Option<DateTime<Utc>>,
}

impl<S: Sensor, K: MeasurementSink> Reader<S, K> {
    /// Bind a reader to a sensor and a sink. Neither binding can change.
    pub fn new(sensor: S, sink: Arc<Mutex<K>>, policy: RangePolicy) -> Self {
        Self {
            sensor,
            sink,
            policy,
            state: CycleState::Idle,
            readings: None,
            reference: None,
            precision: None,
            last_acquisition: None,
        }
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Shared handle to the sink.
    pub fn sink(&self) -> Arc<Mutex<K>> {
        Arc::clone(&self.sink)
    }

    pub fn policy(&self) -> &RangePolicy {
        &self.policy
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Derived per-axis values from the last successful cycle.
    pub fn readings(&self) -> Option<&AxisReadings> {
        self.readings.as_ref()
    }

    /// Reference values from the last successful cycle or adoption.
    pub fn reference(&self) -> Option<&ReferenceReading> {
        self.reference.as_ref()
    }

    /// Last computed precision, if both reading sets exist.
    pub fn precision(&self) -> Option<f64> {
        self.precision
    }

    /// Completion time of the last successful cycle.
    pub fn last_acquisition(&self) -> Option<DateTime<Utc>> {
        self.last_acquisition
    }

    /// Run one full acquisition cycle.
    ///
    /// The sensor is terminated whether or not the cycle succeeds.
    pub fn run_cycle(
        &mut self,
        input: &mut dyn InputProvider,
    ) -> Result<CycleReport, ReaderError> {
        self.state = CycleState::Initializing;
        self.sensor.init();
        tracing::info!(
            "Acquisition cycle started on {} {}",
            self.sensor.kind(),
            self.sensor.channel()
        );

        let sampled = self.sample(input);
        self.sensor.terminate();

        let staged = match sampled {
            Ok(staged) => staged,
            Err(e) => return Err(self.abort(e)),
        };

        self.state = CycleState::Finalizing;
        if let Err(e) = self.finalize(&staged) {
            return Err(self.abort(e));
        }

        let report = self.commit(staged);
        self.state = CycleState::Idle;
        tracing::info!(
            "Acquisition cycle completed on {} {}",
            self.sensor.kind(),
            self.sensor.channel()
        );
        Ok(report)
    }

    /// Compute precision from the two most recent reading sets.
    pub fn calc_precision(&mut self) -> Result<f64, ReaderError> {
        let (reference, readings) = match (&self.reference, &self.readings) {
            (Some(reference), Some(readings)) => (reference, readings),
            _ => return Err(ReaderError::IncompletePrecisionInput),
        };

        let precision = mean_absolute_error(reference, readings);
        self.precision = Some(precision);
        tracing::info!("Precision computed: {:.4}", precision);
        Ok(precision)
    }

    /// Range-check a value and hand it to the sink's setter for `axis`.
    pub fn push_to_sink(&self, axis: Axis, value: f64) -> Result<(), ReaderError> {
        let value = self.policy.check(value)?;

        let mut sink = self
            .sink
            .lock()
            .map_err(|e| ReaderError::SinkUnavailable(format!("Sink lock failed: {}", e)))?;
        sink.set_axis(axis, value)?;

        tracing::debug!("Pushed {}={} to sink", axis, value);
        Ok(())
    }

    /// Take a reference reading acquired by another reader on the same specimen.
    pub fn adopt_reference(&mut self, reference: ReferenceReading) {
        tracing::debug!(
            "Adopted reference height={} length={}",
            reference.height,
            reference.length
        );
        self.reference = Some(reference);
        self.refresh_precision();
    }

    fn sample(&mut self, input: &mut dyn InputProvider) -> Result<Staged, ReaderError> {
        let policy = self.policy;
        let kind = self.sensor.kind();

        if self.sensor.contributes_to_derived_axes() {
            let sampler = self.sensor.as_axis_sampler().ok_or_else(|| {
                SensorError::Configuration(format!(
                    "{} sensor produces derived axes but cannot sample them",
                    kind
                ))
            })?;

            let mut readings = AxisReadings::default();
            let mut counts = SampleCounts::default();

            for axis in Axis::ALL {
                self.state = CycleState::Sampling(axis);
                let limit = window_limit(&policy, sampler.reference_speed_now());
                let polls = window_polls(input, axis, limit)?;

                sampler.set_detecting(true);
                for _ in 0..polls {
                    let sample = sampler.acquire();
                    sampler.record_sample(axis, sample);
                }
                sampler.set_detecting(false);

                let count = sampler.sample_count(axis);
                let value = policy.check(sampler.derive_axis(axis))?;
                tracing::debug!("{} window: {} samples, derived {}", axis, count, value);

                readings.set(axis, value);
                counts.set(axis, count);
            }

            return Ok(Staged::Axes { readings, counts });
        }

        let source = self.sensor.as_reference_source().ok_or_else(|| {
            SensorError::Configuration(format!(
                "{} sensor has no reference capability",
                kind
            ))
        })?;
        let reference = source.acquire_reference(input, &policy)?;
        Ok(Staged::Reference(reference))
    }

    fn finalize(&self, staged: &Staged) -> Result<(), ReaderError> {
        if let Staged::Axes { readings, .. } = staged {
            for axis in Axis::ALL {
                self.push_to_sink(axis, readings.get(axis))?;
            }
        }
        Ok(())
    }

    fn commit(&mut self, staged: Staged) -> CycleReport {
        let completed_at = Utc::now();
        let mut report = CycleReport {
            sensor: self.sensor.kind(),
            readings: None,
            reference: None,
            sample_counts: SampleCounts::default(),
            completed_at,
        };

        match staged {
            Staged::Axes { readings, counts } => {
                report.readings = Some(readings);
                report.sample_counts = counts;
                self.readings = Some(readings);
            }
            Staged::Reference(reference) => {
                report.reference = Some(reference.clone());
                self.reference = Some(reference);
            }
        }

        self.last_acquisition = Some(completed_at);
        self.refresh_precision();
        report
    }

    fn abort(&mut self, err: ReaderError) -> ReaderError {
        tracing::warn!("Acquisition cycle aborted while {}: {}", self.state, err);
        self.state = CycleState::Idle;
        err
    }

    fn refresh_precision(&mut self) {
        self.precision = match (&self.reference, &self.readings) {
            (Some(reference), Some(readings)) => Some(mean_absolute_error(reference, readings)),
            _ => None,
        };
    }
}

/// Most polls a detection window may stay open, whatever the range policy.
pub const MAX_WINDOW_POLLS: usize = 1_000_000;

/// Most polls whose derived distance can still pass `policy`.
///
/// With a bounded policy that is `floor(max / speed) + 1` hits; anything more
/// is rejected before the window opens.
fn window_limit(policy: &RangePolicy, speed: f64) -> usize {
    if policy.reject_above_max && speed > 0.0 {
        let hits = (policy.max / speed).floor() + 1.0;
        if hits >= 0.0 && hits < MAX_WINDOW_POLLS as f64 {
            return hits as usize;
        }
    }
    MAX_WINDOW_POLLS
}

/// Ask how many polls the detection window for `axis` stays open.
fn window_polls(
    input: &mut dyn InputProvider,
    axis: Axis,
    limit: usize,
) -> Result<usize, SensorError> {
    let prompt = Prompt::window(axis).with_max(limit as f64);
    let polls = require(input, &prompt)?;
    if !polls.is_finite() || polls < 0.0 || polls.fract() != 0.0 || polls > limit as f64 {
        return Err(SensorError::InvalidWindow(polls));
    }
    Ok(polls as usize)
}
