//! Observation table module
//!
//! Structure:
//! - `data.rs`: CSV parsing into an in-memory table and point extraction
//! - `properties.rs`: Property registry (plot.json) and typed reader
//! - `error.rs`: Error types

pub mod data;
pub mod error;
pub mod properties;

// Re-exports for convenience
pub use data::{CsvOptions, DataSummary, MissingValuePolicy, ObservationTable};
pub use error::{PlotError, Result};
pub use properties::{registry, PropertyReader};
