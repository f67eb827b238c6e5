//! Sensor capability contracts and the closed set of rig devices.

use super::camera::CameraSensor;
use super::laser::LaserSensor;
use super::types::{Axis, ChannelId, RangePolicy, SensorError, SensorKind, SensorStatus};
use crate::input::InputProvider;
use crate::acquisition::types::ReferenceReading;

/// Lifecycle contract every sensor device implements.
pub trait Sensor: Send {
    /// Kind of device.
    fn kind(&self) -> SensorKind;

    /// Channel the device was bound to at construction.
    fn channel(&self) -> &ChannelId;

    /// Current lifecycle status.
    fn status(&self) -> SensorStatus;

    /// Whether calibration has run since the last reset.
    fn is_calibrated(&self) -> bool;

    /// Whether the device is started.
    fn is_active(&self) -> bool;

    /// Start the device, calibrating first if needed.
    fn init(&mut self);

    /// Read one raw unit. Returns `0.0` when nothing is detected.
    fn acquire(&mut self) -> f64;

    /// Set the reference speed to nominal and mark calibrated.
    fn calibrate(&mut self);

    /// Clear accumulated state and mark uncalibrated. Leaves `active` as is.
    fn reset(&mut self);

    /// Reset, then toggle `active`.
    fn terminate(&mut self);

    /// Reference speed, or `0.0` while uncalibrated.
    fn reference_speed_now(&self) -> f64;

    /// Whether this device produces derived per-axis distances.
    fn contributes_to_derived_axes(&self) -> bool;

    /// Axis-sampling capability, if the device has one.
    fn as_axis_sampler(&mut self) -> Option<&mut dyn AxisSampler> {
        None
    }

    /// Reference-reading capability, if the device has one.
    fn as_reference_source(&mut self) -> Option<&mut dyn ReferenceSource> {
        None
    }
}

/// Capability of devices that accumulate detection samples per axis.
pub trait AxisSampler: Sensor {
    /// Open or close the detection window.
    fn set_detecting(&mut self, detecting: bool);

    /// Whether a detection window is open.
    fn is_detecting(&self) -> bool;

    /// Append a sample to an axis sequence. Ignored while no window is open.
    fn record_sample(&mut self, axis: Axis, sample: f64);

    /// Number of samples recorded for an axis.
    fn sample_count(&self, axis: Axis) -> usize;

    /// Distance travelled along an axis: `v * (n - 1)`, or `0` with no samples.
    fn derive_axis(&self, axis: Axis) -> f64;
}

/// Capability of devices that supply a reference height/length pair.
pub trait ReferenceSource: Sensor {
    /// Acquire one reference reading, rejecting values outside `policy`.
    fn acquire_reference(
        &mut self,
        input: &mut dyn InputProvider,
        policy: &RangePolicy,
    ) -> Result<ReferenceReading, SensorError>;
}

/// The closed set of devices the rig can mount.
#[derive(Debug, Clone)]
pub enum SensorDevice {
    Laser(LaserSensor),
    Camera(CameraSensor),
}

impl SensorDevice {
    /// Build a device of the given kind on a channel.
    pub fn new(kind: SensorKind, channel: &str) -> Result<Self, SensorError> {
        match kind {
            SensorKind::Laser => Ok(SensorDevice::Laser(LaserSensor::new(channel)?)),
            SensorKind::Camera => Ok(SensorDevice::Camera(CameraSensor::new(channel)?)),
        }
    }

    fn inner(&self) -> &dyn Sensor {
        match self {
            SensorDevice::Laser(laser) => laser,
            SensorDevice::Camera(camera) => camera,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Sensor {
        match self {
            SensorDevice::Laser(laser) => laser,
            SensorDevice::Camera(camera) => camera,
        }
    }
}

impl From<LaserSensor> for SensorDevice {
    fn from(laser: LaserSensor) -> Self {
        SensorDevice::Laser(laser)
    }
}

impl From<CameraSensor> for SensorDevice {
    fn from(camera: CameraSensor) -> Self {
        SensorDevice::Camera(camera)
    }
}

impl Sensor for SensorDevice {
    fn kind(&self) -> SensorKind {
        self.inner().kind()
    }

    fn channel(&self) -> &ChannelId {
        self.inner().channel()
    }

    fn status(&self) -> SensorStatus {
        self.inner().status()
    }

    fn is_calibrated(&self) -> bool {
        self.inner().is_calibrated()
    }

    fn is_active(&self) -> bool {
        self.inner().is_active()
    }

    fn init(&mut self) {
        self.inner_mut().init()
    }

    fn acquire(&mut self) -> f64 {
        self.inner_mut().acquire()
    }

    fn calibrate(&mut self) {
        self.inner_mut().calibrate()
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }

    fn terminate(&mut self) {
        self.inner_mut().terminate()
    }

    fn reference_speed_now(&self) -> f64 {
        self.inner().reference_speed_now()
    }

    fn contributes_to_derived_axes(&self) -> bool {
        self.inner().contributes_to_derived_axes()
    }

    fn as_axis_sampler(&mut self) -> Option<&mut dyn AxisSampler> {
        self.inner_mut().as_axis_sampler()
    }

    fn as_reference_source(&mut self) -> Option<&mut dyn ReferenceSource> {
        self.inner_mut().as_reference_source()
    }
}
