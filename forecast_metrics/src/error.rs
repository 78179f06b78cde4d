//! Error types for the forecast_metrics crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the forecast_metrics crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Not enough usable observations for the requested operation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A referenced column is missing or has an unusable dtype
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    /// A parameter is outside its documented domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A forecasting method cannot run on the given series. The engine
    /// recovers from this by falling back to the linear method; callers
    /// only see it when invoking a model directly.
    #[error("Method unavailable: {0}")]
    MethodUnavailable(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<metric_math::MathError> for ForecastError {
    fn from(err: metric_math::MathError) -> Self {
        match err {
            metric_math::MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            metric_math::MathError::InvalidInput(msg) => ForecastError::InvalidParameter(msg),
            metric_math::MathError::CalculationError(msg) => ForecastError::DataError(msg),
        }
    }
}
