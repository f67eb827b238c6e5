//! Vision sensor used as ground truth for the laser.
//!
//! The camera is stationary on the rig. Each cycle it takes one reading of
//! the specimen's height and length, which the reader uses only to check
//! the laser's accuracy.

use super::device::{ReferenceSource, Sensor};
use super::types::{ChannelId, LifecycleFlags, RangePolicy, SensorError, SensorKind, SensorStatus};
use crate::acquisition::types::ReferenceReading;
use crate::input::{require, InputProvider, Prompt};

/// Camera sensor supplying reference height and length.
#[derive(Debug, Clone)]
pub struct CameraSensor {
    channel: ChannelId,
    flags: LifecycleFlags,
    last_reference: Option<ReferenceReading>,
}

impl CameraSensor {
    /// Create a camera bound to a channel.
    pub fn new(channel: &str) -> Result<Self, SensorError> {
        Ok(Self {
            channel: ChannelId::parse(channel)?,
            flags: LifecycleFlags::default(),
            last_reference: None,
        })
    }

    /// Reading taken since the last reset, if any.
    pub fn last_reference(&self) -> Option<&ReferenceReading> {
        self.last_reference.as_ref()
    }

    fn set_active(&mut self, active: bool) {
        if active && !self.flags.calibrated {
            self.calibrate();
        }
        self.flags.active = active;
    }
}

impl Sensor for CameraSensor {
    fn kind(&self) -> SensorKind {
        SensorKind::Camera
    }

    fn channel(&self) -> &ChannelId {
        &self.channel
    }

    fn status(&self) -> SensorStatus {
        self.flags.status(false)
    }

    fn is_calibrated(&self) -> bool {
        self.flags.calibrated
    }

    fn is_active(&self) -> bool {
        self.flags.active
    }

    fn init(&mut self) {
        self.set_active(true);
        self.flags.terminated = false;
        tracing::info!("Camera on {} initialized", self.channel);
    }

    /// The camera's output is its reference reading; a single poll carries
    /// no detection, so this is always the sentinel.
    fn acquire(&mut self) -> f64 {
        0.0
    }

    fn calibrate(&mut self) {
        self.flags.calibrated = true;
        tracing::info!("Camera on {} calibrated", self.channel);
    }

    fn reset(&mut self) {
        self.last_reference = None;
        self.flags.calibrated = false;
        tracing::debug!("Camera on {} reset", self.channel);
    }

    fn terminate(&mut self) {
        self.reset();

        let next = !self.flags.active;
        if next {
            tracing::warn!(
                "Terminate toggled inactive camera on {} back on",
                self.channel
            );
        }
        self.set_active(next);
        self.flags.terminated = true;
        tracing::info!("Camera on {} terminated", self.channel);
    }

    fn reference_speed_now(&self) -> f64 {
        0.0
    }

    fn contributes_to_derived_axes(&self) -> bool {
        false
    }

    fn as_reference_source(&mut self) -> Option<&mut dyn ReferenceSource> {
        Some(self)
    }
}

impl ReferenceSource for CameraSensor {
    fn acquire_reference(
        &mut self,
        input: &mut dyn InputProvider,
        policy: &RangePolicy,
    ) -> Result<ReferenceReading, SensorError> {
        let height = require(input, &Prompt::measurement("Camera height", policy))?;
        let height = policy.check(height)?;

        let length = require(input, &Prompt::measurement("Camera length", policy))?;
        let length = policy.check(length)?;

        let reading = ReferenceReading::new(height, length);
        tracing::info!(
            "Camera on {} read height={} length={}",
            self.channel,
            height,
            length
        );
        self.last_reference = Some(reading.clone());
        Ok(reading)
    }
}
