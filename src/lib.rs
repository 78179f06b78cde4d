//! # MetricSight Analytics
//!
//! `metricsight_workspace` bundles the MetricSight analytics crates:
//! [`forecast_metrics`] for time series forecasting, anomaly screening and
//! trend grading, [`correlate_metrics`] for correlation analysis across
//! metric tables, and the [`metric_math`] primitives both build on.
//!
//! ## Example
//!
//! ```
//! use metricsight_workspace::forecast_metrics::engine::{ForecastConfig, ForecastEngine};
//! use metricsight_workspace::forecast_metrics::models::ForecastMethod;
//! use metricsight_workspace::forecast_metrics::utils::generate_linear_frame;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
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
//! # Ok(())
//! # }
//! ```

pub use correlate_metrics;
pub use forecast_metrics;
pub use metric_math;
