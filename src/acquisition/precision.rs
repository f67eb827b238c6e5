//! Precision metric between a reference reading and derived laser values.
//!
//! Despite the name, precision here is a mean absolute error over height and
//! length: lower is better.

use super::types::{AxisReadings, ReferenceReading};

/// Mean of the absolute height and length differences.
pub fn mean_absolute_error(reference: &ReferenceReading, laser: &AxisReadings) -> f64 {
    let height = (reference.height - laser.height).abs();
    let length = (reference.length - laser.length).abs();
    (height + length) / 2.0
}
