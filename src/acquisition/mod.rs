//! Acquisition module driving sensors through measurement cycles.

pub mod precision;
pub mod reader;
pub mod types;

pub use precision::mean_absolute_error;
pub use reader::Reader;
pub use types::{
    AxisReadings, CycleReport, CycleState, ReaderError, ReferenceReading, SampleCounts,
};
