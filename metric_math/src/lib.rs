//! # Metric Math
//!
//! Statistical primitives for metric analytics: descriptive statistics,
//! rolling windows, correlation, least-squares regression, and a
//! stationarity test. Everything operates on plain `f64` slices so the
//! engine crates can extract columns once and stay out of DataFrame land
//! for the actual math.

use thiserror::Error;

// Primitive modules
pub mod correlation;
pub mod descriptive;
pub mod regression;
pub mod rolling;
pub mod stationarity;

/// Errors that can occur in statistical calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for statistical operations
pub type Result<T> = std::result::Result<T, MathError>;
