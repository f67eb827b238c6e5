//! Specimen record receiving the final measurements.
//!
//! The record validates each field on its own. Range checks against the
//! device maximum belong to the reader; the specimen only refuses negative
//! dimensions and blank descriptive fields.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::sensors::types::Axis;

/// Destination of validated per-axis measurements.
pub trait MeasurementSink: Send {
    fn set_height(&mut self, value: f64) -> Result<(), SinkError>;
    fn set_length(&mut self, value: f64) -> Result<(), SinkError>;
    fn set_depth(&mut self, value: f64) -> Result<(), SinkError>;

    /// Route a value to the setter for `axis`.
    fn set_axis(&mut self, axis: Axis, value: f64) -> Result<(), SinkError> {
        match axis {
            Axis::Height => self.set_height(value),
            Axis::Length => self.set_length(value),
            Axis::Depth => self.set_depth(value),
        }
    }
}

/// Errors raised by the specimen record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SinkError {
    #[error("{field} cannot be negative, got {value}")]
    NegativeMeasurement { field: &'static str, value: f64 },

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

/// A physical specimen sent for measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specimen {
    pub id: Uuid,
    pub collected_on: NaiveDate,
    collection_site: String,
    collection_type: String,
    anatomical_site: String,
    height: f64,
    length: f64,
    depth: f64,
}

impl Specimen {
    /// Create a specimen collected today.
    pub fn new(
        collection_site: &str,
        collection_type: &str,
        anatomical_site: &str,
    ) -> Result<Self, SinkError> {
        let mut specimen = Self {
            id: Uuid::new_v4(),
            collected_on: Utc::now().date_naive(),
            collection_site: String::new(),
            collection_type: String::new(),
            anatomical_site: String::new(),
            height: 0.0,
            length: 0.0,
            depth: 0.0,
        };
        specimen.set_collection_site(collection_site)?;
        specimen.set_collection_type(collection_type)?;
        specimen.set_anatomical_site(anatomical_site)?;
        Ok(specimen)
    }

    pub fn collection_site(&self) -> &str {
        &self.collection_site
    }

    pub fn collection_type(&self) -> &str {
        &self.collection_type
    }

    pub fn anatomical_site(&self) -> &str {
        &self.anatomical_site
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn set_collection_site(&mut self, value: &str) -> Result<(), SinkError> {
        self.collection_site = non_empty("collection site", value)?;
        Ok(())
    }

    pub fn set_collection_type(&mut self, value: &str) -> Result<(), SinkError> {
        self.collection_type = non_empty("collection type", value)?;
        Ok(())
    }

    pub fn set_anatomical_site(&mut self, value: &str) -> Result<(), SinkError> {
        self.anatomical_site = non_empty("anatomical site", value)?;
        Ok(())
    }
}

impl MeasurementSink for Specimen {
    fn set_height(&mut self, value: f64) -> Result<(), SinkError> {
        self.height = non_negative("height", value)?;
        Ok(())
    }

    fn set_length(&mut self, value: f64) -> Result<(), SinkError> {
        self.length = non_negative("length", value)?;
        Ok(())
    }

    fn set_depth(&mut self, value: f64) -> Result<(), SinkError> {
        self.depth = non_negative("depth", value)?;
        Ok(())
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<String, SinkError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SinkError::EmptyField(field));
    }
    Ok(value.to_string())
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, SinkError> {
    if value.is_nan() || value < 0.0 {
        return Err(SinkError::NegativeMeasurement { field, value });
    }
    Ok(value)
}
