//! Input boundary supplying raw numeric values on demand.
//!
//! The acquisition core only asks for values and rejects bad ones. Any
//! re-prompting on bad input belongs to the provider implementations here.

pub mod console;
pub mod scripted;

use crate::sensors::types::{Axis, RangePolicy, SensorError};
use thiserror::Error;

// Re-export types
pub use console::ConsoleInput;
pub use scripted::ScriptedInput;

/// A request for one numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    /// Text shown to the operator
    pub text: String,
    /// Smallest acceptable value
    pub min: f64,
    /// Largest acceptable value
    pub max: f64,
    /// Only whole numbers are acceptable
    pub whole: bool,
}

impl Prompt {
    /// Prompt for a measurement within the given range policy.
    pub fn measurement(text: impl Into<String>, policy: &RangePolicy) -> Self {
        Self {
            text: text.into(),
            min: 0.0,
            max: policy.upper_bound(),
            whole: false,
        }
    }

    /// Prompt for the number of polls a detection window stays open.
    pub fn window(axis: Axis) -> Self {
        Self {
            text: format!("Detection polls for the {} window", axis),
            min: 0.0,
            max: f64::INFINITY,
            whole: true,
        }
    }

    /// Tighten the upper bound.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    /// Whether a value satisfies this prompt's bounds.
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite()
            && value >= self.min
            && value <= self.max
            && (!self.whole || value.fract() == 0.0)
    }
}

/// Source of numeric values for the acquisition core.
pub trait InputProvider {
    /// Request a value. `Ok(None)` means the operator cancelled.
    fn request(&mut self, prompt: &Prompt) -> Result<Option<f64>, InputError>;
}

impl<T: InputProvider + ?Sized> InputProvider for &mut T {
    fn request(&mut self, prompt: &Prompt) -> Result<Option<f64>, InputError> {
        (**self).request(prompt)
    }
}

/// Request a value, treating cancellation as an aborted step.
pub fn require(input: &mut dyn InputProvider, prompt: &Prompt) -> Result<f64, SensorError> {
    match input.request(prompt)? {
        Some(value) => Ok(value),
        None => {
            tracing::info!("Acquisition step cancelled: {}", prompt.text);
            Err(SensorError::Cancelled)
        }
    }
}

/// Errors raised by input providers.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No valid value for '{prompt}' after {attempts} attempts")]
    AttemptsExhausted { prompt: String, attempts: u32 },

    #[error("Scripted input exhausted at '{0}'")]
    Exhausted(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl From<InputError> for SensorError {
    fn from(err: InputError) -> Self {
        SensorError::Input(err.to_string())
    }
}
