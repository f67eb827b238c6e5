//! One measurement pass over a specimen with both rig sensors.
//!
//! The laser reader and the camera reader are bound to the same specimen.
//! The laser cycle runs first and pushes its derived values; the camera
//! cycle then supplies the reference the laser is checked against.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::acquisition::types::{AxisReadings, ReaderError, ReferenceReading, SampleCounts};
use crate::acquisition::Reader;
use crate::config::RigConfig;
use crate::input::InputProvider;
use crate::sensors::{CameraSensor, LaserSensor, Sensor, SensorDevice, SensorError};
use crate::specimen::Specimen;

/// Result of one measurement pass.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Specimen as it stands after the pass
    pub specimen: Specimen,
    pub laser: AxisReadings,
    pub laser_samples: SampleCounts,
    pub reference: ReferenceReading,
    /// Mean absolute error of the laser against the camera
    pub precision: f64,
    pub completed_at: DateTime<Utc>,
}

/// Laser and camera readers sharing one specimen.
pub struct MeasurementSession {
    specimen: Arc<Mutex<Specimen>>,
    laser: Reader<SensorDevice, Specimen>,
    camera: Reader<SensorDevice, Specimen>,
}

impl MeasurementSession {
    /// Bind both devices to a specimen.
    ///
    /// The laser device must produce derived axes and the camera must not.
    pub fn new(
        laser: SensorDevice,
        camera: SensorDevice,
        specimen: Specimen,
        config: &RigConfig,
    ) -> Result<Self, ReaderError> {
        if !laser.contributes_to_derived_axes() {
            return Err(SensorError::Configuration(format!(
                "{} on {} cannot act as the laser",
                laser.kind(),
                laser.channel()
            ))
            .into());
        }
        if camera.contributes_to_derived_axes() {
            return Err(SensorError::Configuration(format!(
                "{} on {} cannot act as the camera",
                camera.kind(),
                camera.channel()
            ))
            .into());
        }

        let policy = config.range.policy();
        let specimen = Arc::new(Mutex::new(specimen));
        Ok(Self {
            laser: Reader::new(laser, Arc::clone(&specimen), policy),
            camera: Reader::new(camera, Arc::clone(&specimen), policy),
            specimen,
        })
    }

    /// Build the devices and specimen described by a configuration.
    pub fn from_config(config: &RigConfig) -> Result<Self, ReaderError> {
        let laser = LaserSensor::with_nominal_speed(
            &config.laser.channel,
            config.laser.nominal_speed,
        )?;
        let camera = CameraSensor::new(&config.camera.channel)?;
        let specimen = Specimen::new(
            &config.specimen.collection_site,
            &config.specimen.collection_type,
            &config.specimen.anatomical_site,
        )?;

        Self::new(laser.into(), camera.into(), specimen, config)
    }

    pub fn laser(&self) -> &Reader<SensorDevice, Specimen> {
        &self.laser
    }

    pub fn camera(&self) -> &Reader<SensorDevice, Specimen> {
        &self.camera
    }

    /// Snapshot of the specimen record.
    pub fn specimen(&self) -> Result<Specimen, ReaderError> {
        let guard = self
            .specimen
            .lock()
            .map_err(|e| ReaderError::SinkUnavailable(format!("Specimen lock failed: {}", e)))?;
        Ok(guard.clone())
    }

    /// Run the laser cycle, then the camera cycle, then compute precision.
    pub fn run(&mut self, input: &mut dyn InputProvider) -> Result<SessionSummary, ReaderError> {
        let laser_report = self.laser.run_cycle(input)?;
        let camera_report = self.camera.run_cycle(input)?;

        let reference = camera_report
            .reference
            .ok_or(ReaderError::IncompletePrecisionInput)?;
        let laser = laser_report
            .readings
            .ok_or(ReaderError::IncompletePrecisionInput)?;

        self.laser.adopt_reference(reference.clone());
        let precision = self.laser.calc_precision()?;

        tracing::info!(
            "Measurement pass done: height={:.3} length={:.3} depth={:.3} precision={:.4}",
            laser.height,
            laser.length,
            laser.depth,
            precision
        );

        Ok(SessionSummary {
            specimen: self.specimen()?,
            laser,
            laser_samples: laser_report.sample_counts,
            reference,
            precision,
            completed_at: camera_report.completed_at,
        })
    }
}
