//! Laser distance sensor.
//!
//! The laser does not measure distance directly. While a detection window
//! is open every poll reports a hit, and the number of hits recorded for an
//! axis stands in for the time the slider spent travelling across the
//! specimen. Distance then follows from `S = v * Δ`, where `Δ` is the
//! number of intervals between hits (`n - 1`).

use super::device::{AxisSampler, Sensor};
use super::types::{
    Axis, ChannelId, LifecycleFlags, SensorError, SensorKind, SensorStatus,
    NOMINAL_REFERENCE_SPEED,
};

/// Laser sensor accumulating detection samples per axis.
#[derive(Debug, Clone)]
pub struct LaserSensor {
    channel: ChannelId,
    flags: LifecycleFlags,
    detecting: bool,
    /// Speed the slider is calibrated to
    nominal_speed: f64,
    /// Stored reference speed; only observable while calibrated
    reference_speed: f64,
    height: Vec<f64>,
    length: Vec<f64>,
    depth: Vec<f64>,
}

impl LaserSensor {
    /// Create a laser bound to a channel, using the nominal slider speed.
    pub fn new(channel: &str) -> Result<Self, SensorError> {
        Self::with_nominal_speed(channel, NOMINAL_REFERENCE_SPEED)
    }

    /// Create a laser with a non-default nominal slider speed.
    pub fn with_nominal_speed(channel: &str, nominal_speed: f64) -> Result<Self, SensorError> {
        if !nominal_speed.is_finite() || nominal_speed <= 0.0 {
            return Err(SensorError::Configuration(format!(
                "nominal speed must be positive, got {}",
                nominal_speed
            )));
        }

        Ok(Self {
            channel: ChannelId::parse(channel)?,
            flags: LifecycleFlags::default(),
            detecting: false,
            nominal_speed,
            reference_speed: 0.0,
            height: Vec::new(),
            length: Vec::new(),
            depth: Vec::new(),
        })
    }

    /// Samples recorded for an axis.
    pub fn samples(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Height => &self.height,
            Axis::Length => &self.length,
            Axis::Depth => &self.depth,
        }
    }

    /// Derive a distance for an axis given by name.
    pub fn derive_axis_named(&self, axis: &str) -> Result<f64, SensorError> {
        let axis: Axis = axis.parse()?;
        Ok(self.derive_axis(axis))
    }

    fn samples_mut(&mut self, axis: Axis) -> &mut Vec<f64> {
        match axis {
            Axis::Height => &mut self.height,
            Axis::Length => &mut self.length,
            Axis::Depth => &mut self.depth,
        }
    }

    fn set_active(&mut self, active: bool) {
        if active && !self.flags.calibrated {
            self.calibrate();
        }
        self.flags.active = active;
    }
}

impl Sensor for LaserSensor {
    fn kind(&self) -> SensorKind {
        SensorKind::Laser
    }

    fn channel(&self) -> &ChannelId {
        &self.channel
    }

    fn status(&self) -> SensorStatus {
        self.flags.status(self.detecting)
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
        tracing::info!("Laser on {} initialized", self.channel);
    }

    fn acquire(&mut self) -> f64 {
        if self.flags.active && self.detecting {
            1.0
        } else {
            0.0
        }
    }

    fn calibrate(&mut self) {
        if self.reference_speed != self.nominal_speed {
            self.reference_speed = self.nominal_speed;
        }
        self.flags.calibrated = true;
        tracing::info!(
            "Laser on {} calibrated to {} units/tick",
            self.channel,
            self.reference_speed
        );
    }

    fn reset(&mut self) {
        self.height.clear();
        self.length.clear();
        self.depth.clear();
        self.flags.calibrated = false;
        tracing::debug!("Laser on {} reset", self.channel);
    }

    fn terminate(&mut self) {
        self.reset();
        self.detecting = false;

        let next = !self.flags.active;
        if next {
            tracing::warn!(
                "Terminate toggled inactive laser on {} back on",
                self.channel
            );
        }
        self.set_active(next);
        self.flags.terminated = true;
        tracing::info!("Laser on {} terminated", self.channel);
    }

    fn reference_speed_now(&self) -> f64 {
        if !self.flags.calibrated {
            return 0.0;
        }
        self.reference_speed
    }

    fn contributes_to_derived_axes(&self) -> bool {
        true
    }

    fn as_axis_sampler(&mut self) -> Option<&mut dyn AxisSampler> {
        Some(self)
    }
}

impl AxisSampler for LaserSensor {
    fn set_detecting(&mut self, detecting: bool) {
        self.detecting = detecting;
        tracing::debug!(
            "Laser on {} detection window {}",
            self.channel,
            if detecting { "opened" } else { "closed" }
        );
    }

    fn is_detecting(&self) -> bool {
        self.detecting
    }

    fn record_sample(&mut self, axis: Axis, sample: f64) {
        if !self.detecting {
            tracing::debug!("Ignoring {} sample outside a detection window", axis);
            return;
        }
        if sample != 0.0 {
            self.samples_mut(axis).push(sample);
        }
    }

    fn sample_count(&self, axis: Axis) -> usize {
        self.samples(axis).len()
    }

    fn derive_axis(&self, axis: Axis) -> f64 {
        match self.samples(axis).len() {
            0 => 0.0,
            n => self.reference_speed_now() * (n - 1) as f64,
        }
    }
}
