//! Specimen Rig - Two-sensor dimensional measurement
//!
//! Simulates a measurement rig for physical specimens: a laser infers
//! height, length and depth from detection samples, and a camera supplies
//! reference values used to check the laser's precision.

pub mod acquisition;
pub mod config;
pub mod input;
pub mod sensors;
pub mod session;
pub mod specimen;

// Re-export commonly used types
pub use acquisition::reader::Reader;
pub use config::RigConfig;
pub use session::{MeasurementSession, SessionSummary};
pub use specimen::{MeasurementSink, Specimen};
