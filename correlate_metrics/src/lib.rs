//! # Correlate Metrics
//!
//! A Rust library for correlation analysis across business metric tables.
//!
//! ## Features
//!
//! - Pearson, Spearman, and Kendall correlation matrices with p-values
//! - Significant pair filtering with strength and direction grading
//! - Correlation clusters, partial correlations, and VIF scores
//! - Time-lagged correlation for leading/lagging indicator discovery
//! - Spurious correlation screening via stationarity testing
//! - Exact significance tests with Fisher confidence intervals
//!
//! Every operation is a pure function of its inputs: the same frame and
//! configuration always produce the same report.
//!
//! ## Quick Start
//!
//! ```rust
//! use correlate_metrics::analyzer::{analyze_correlations, CorrelationConfig};
//! use polars::prelude::*;
//!
//! # fn main() -> correlate_metrics::error::Result<()> {
//! let df = df! {
//!     "visits" => &[120.0, 135.0, 160.0, 142.0, 171.0, 188.0],
//!     "signups" => &[12.0, 14.0, 17.0, 15.0, 18.0, 20.0],
//! }?;
//!
//! let config = CorrelationConfig::default();
//! let report = analyze_correlations(&df, &["visits", "signups"], &config)?;
//!
//! assert_eq!(report.num_variables, 2);
//! let r = report.correlation_matrix.get("visits", "signups");
//! assert!(r.is_some());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod clusters;
pub mod dataset;
pub mod error;
pub mod lagged;
pub mod measures;
pub mod multicollinearity;
pub mod significance;
pub mod spurious;

// Re-export commonly used types
pub use crate::analyzer::{analyze_correlations, CorrelationConfig, CorrelationReport};
pub use crate::dataset::numeric_columns;
pub use crate::error::CorrelationError;
pub use crate::lagged::{lagged_correlation, LaggedCorrelationReport};
pub use crate::measures::CorrelationMethod;
pub use crate::significance::{correlation_significance, SignificanceReport};
pub use crate::spurious::{detect_spurious, SpuriousFlag};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
