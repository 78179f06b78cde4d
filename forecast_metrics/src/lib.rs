//! # Forecast Metrics
//!
//! A Rust library for forecasting business metric time series and
//! screening them for anomalies and trends.
//!
//! ## Features
//!
//! - Time series preparation from polars DataFrames or CSV files
//! - Forecasting models (Linear, Moving Average, Exponential, Seasonal)
//! - Automatic method selection with seasonality detection
//! - Confidence intervals on every forecast point
//! - Rolling-band anomaly detection and trend strength grading
//!
//! Every operation is a pure function of its inputs: the same frame and
//! configuration always produce the same report.
//!
//! ## Quick Start
//!
//! ```rust
//! use forecast_metrics::engine::{ForecastConfig, ForecastEngine};
//! use forecast_metrics::models::ForecastMethod;
//! use forecast_metrics::utils::generate_linear_frame;
//!
//! # fn main() -> forecast_metrics::error::Result<()> {
//! let df = generate_linear_frame(30, 100.0, 2.0, 0.5, 7)?;
//!
//! let engine = ForecastEngine::new();
//! let config = ForecastConfig {
//!     method: ForecastMethod::Linear,
//!     ..Default::default()
//! };
//! let result = engine.forecast(&df, "timestamp", "value", &config)?;
//!
//! assert_eq!(result.forecast.len(), config.periods);
//! for point in &result.forecast {
//!     assert!(point.lower_bound <= point.forecast);
//!     assert!(point.forecast <= point.upper_bound);
//! }
//! # Ok(())
//! # }
//! ```

pub mod accuracy;
pub mod anomaly;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod trend;
pub mod utils;

// Re-export commonly used types
pub use crate::accuracy::AccuracyMetrics;
pub use crate::anomaly::{detect_anomalies, AnomalyRecord};
pub use crate::data::{DataLoader, DataPreparer, PreparedSeries};
pub use crate::engine::{ForecastConfig, ForecastEngine, ForecastResult};
pub use crate::error::ForecastError;
pub use crate::models::{ForecastMethod, ForecastPoint, Trend};
pub use crate::trend::{trend_strength, TrendSummary};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
