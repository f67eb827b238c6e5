//! Sensor module for the laser and camera devices of the rig.

pub mod camera;
pub mod device;
pub mod laser;
pub mod types;

pub use camera::CameraSensor;
pub use device::{AxisSampler, ReferenceSource, Sensor, SensorDevice};
pub use laser::LaserSensor;
pub use types::{
    Axis, ChannelId, RangePolicy, SensorError, SensorKind, SensorStatus, MAX_RANGE,
    NOMINAL_REFERENCE_SPEED,
};
