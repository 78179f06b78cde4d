//! Error types for correlation analysis

use thiserror::Error;

/// Errors from correlation analysis operations
#[derive(Error, Debug)]
pub enum CorrelationError {
    /// Too few variables or observations for the requested analysis
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A named column is missing or not numeric
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    /// A parameter is outside its accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A calculation could not be completed on the given data
    #[error("Data error: {0}")]
    DataError(String),

    /// Error raised by the underlying DataFrame library
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type for correlation analysis operations
pub type Result<T> = std::result::Result<T, CorrelationError>;

impl From<polars::error::PolarsError> for CorrelationError {
    fn from(err: polars::error::PolarsError) -> Self {
        CorrelationError::PolarsError(err.to_string())
    }
}

impl From<metric_math::MathError> for CorrelationError {
    fn from(err: metric_math::MathError) -> Self {
        match err {
            metric_math::MathError::InsufficientData(msg) => {
                CorrelationError::InsufficientData(msg)
            }
            metric_math::MathError::InvalidInput(msg) => CorrelationError::InvalidParameter(msg),
            metric_math::MathError::CalculationError(msg) => CorrelationError::DataError(msg),
        }
    }
}

impl From<forecast_metrics::ForecastError> for CorrelationError {
    fn from(err: forecast_metrics::ForecastError) -> Self {
        match err {
            forecast_metrics::ForecastError::InsufficientData(msg) => {
                CorrelationError::InsufficientData(msg)
            }
            forecast_metrics::ForecastError::InvalidColumn(msg) => {
                CorrelationError::InvalidColumn(msg)
            }
            forecast_metrics::ForecastError::InvalidParameter(msg) => {
                CorrelationError::InvalidParameter(msg)
            }
            other => CorrelationError::DataError(other.to_string()),
        }
    }
}
