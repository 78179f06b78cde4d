//! Numeric table extraction and cleaning
//!
//! Correlation analysis works on a dense column-major table. Cleaning
//! drops columns that carry no information (all null, or constant) and
//! mean-fills the remaining gaps so every pairwise computation sees the
//! same row count.

use crate::error::{CorrelationError, Result};
use forecast_metrics::data::extract_numeric;
use metric_math::descriptive::sample_std;
use polars::prelude::DataFrame;

/// Cleaned numeric columns, ready for pairwise analysis
#[derive(Debug, Clone)]
pub struct NumericTable {
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
    rows: usize,
}

impl NumericTable {
    /// Extract and clean the named metric columns from a frame.
    ///
    /// All-null columns and zero-variance columns are dropped with a
    /// logged warning; remaining nulls are filled with the column mean.
    /// Fails when fewer than 2 metrics are named or fewer than 2 columns
    /// survive cleaning.
    pub fn from_dataframe(df: &DataFrame, metrics: &[&str]) -> Result<Self> {
        if metrics.len() < 2 {
            return Err(CorrelationError::InsufficientData(format!(
                "Need at least 2 metrics for correlation analysis, got {}",
                metrics.len()
            )));
        }

        let rows = df.height();
        let mut columns = Vec::with_capacity(metrics.len());
        let mut values: Vec<Vec<f64>> = Vec::with_capacity(metrics.len());

        for name in metrics {
            let raw = extract_numeric(df, name)?;
            let present: Vec<f64> = raw.iter().filter_map(|v| *v).collect();
            if present.is_empty() {
                log::warn!("Dropping column '{}': all values are null", name);
                continue;
            }
            match sample_std(&present) {
                Some(s) if s > 0.0 => {}
                _ => {
                    log::warn!("Dropping column '{}': no variance", name);
                    continue;
                }
            }
            let mean = present.iter().sum::<f64>() / present.len() as f64;
            let filled: Vec<f64> = raw.iter().map(|v| v.unwrap_or(mean)).collect();
            columns.push(name.to_string());
            values.push(filled);
        }

        if columns.len() < 2 {
            return Err(CorrelationError::InsufficientData(format!(
                "Need at least 2 usable numeric columns, got {}",
                columns.len()
            )));
        }

        Ok(NumericTable {
            columns,
            values,
            rows,
        })
    }

    /// Cleaned column names, in request order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values of one column
    pub fn column(&self, index: usize) -> &[f64] {
        &self.values[index]
    }

    /// Number of cleaned columns
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.rows
    }
}

/// Names of all numeric columns in a frame, in frame order.
///
/// Convenience for callers that want to correlate every metric a table
/// carries.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|s| s.dtype().is_numeric())
        .map(|s| s.name().to_string())
        .collect()
}
