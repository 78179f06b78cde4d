//! Time-lagged correlation
//!
//! Slides one metric against another to find leading or lagging
//! relationships. A positive lag means the first metric leads.

use crate::error::{CorrelationError, Result};
use crate::measures::pearson_p_value;
use chrono::{DateTime, Utc};
use forecast_metrics::data::{extract_numeric, extract_timestamps};
use metric_math::correlation::pearson;
use polars::prelude::DataFrame;
use serde::Serialize;

/// p-value below which a lag counts as significant
pub const LAG_SIGNIFICANCE_P: f64 = 0.05;

/// Correlation at one lag offset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LagCorrelation {
    /// Offset in periods; positive means metric1 leads
    pub lag: i64,
    /// Pearson correlation over the overlapping rows
    pub correlation: f64,
    /// Two-sided p-value over the overlap
    pub p_value: f64,
    /// Whether the p-value clears [`LAG_SIGNIFICANCE_P`]
    pub is_significant: bool,
}

/// The lag with the strongest correlation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestLag {
    /// Offset in periods
    pub lag: i64,
    /// Correlation at that offset
    pub correlation: f64,
}

/// Full lagged correlation report for a metric pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaggedCorrelationReport {
    /// First metric name
    pub metric1: String,
    /// Second metric name
    pub metric2: String,
    /// Correlations at every lag from -max_lag to +max_lag
    pub lagged_correlations: Vec<LagCorrelation>,
    /// Lag with the largest |r|, earliest lag winning ties
    pub best_lag: BestLag,
    /// Reading of the best lag in words
    pub relationship: String,
    /// Requested maximum lag
    pub max_lag_tested: usize,
}

/// Correlate two metrics across time offsets.
///
/// Rows are sorted by the time column; rows with a null timestamp or a
/// null in either metric are dropped. Needs at least `max_lag + 3` rows
/// so every overlap supports a p-value.
pub fn lagged_correlation(
    df: &DataFrame,
    time_column: &str,
    metric1: &str,
    metric2: &str,
    max_lag: usize,
) -> Result<LaggedCorrelationReport> {
    if max_lag < 1 {
        return Err(CorrelationError::InvalidParameter(
            "max_lag must be at least 1".to_string(),
        ));
    }

    let timestamps = extract_timestamps(df, time_column)?;
    let first = extract_numeric(df, metric1)?;
    let second = extract_numeric(df, metric2)?;

    let mut rows: Vec<(DateTime<Utc>, f64, f64)> = timestamps
        .into_iter()
        .zip(first)
        .zip(second)
        .filter_map(|((ts, a), b)| match (ts, a, b) {
            (Some(ts), Some(a), Some(b)) => Some((ts, a, b)),
            _ => None,
        })
        .collect();
    rows.sort_by_key(|row| row.0);

    let n = rows.len();
    if n < max_lag + 3 {
        return Err(CorrelationError::InsufficientData(format!(
            "Need at least {} aligned rows for a max lag of {}, got {}",
            max_lag + 3,
            max_lag,
            n
        )));
    }

    let a: Vec<f64> = rows.iter().map(|row| row.1).collect();
    let b: Vec<f64> = rows.iter().map(|row| row.2).collect();

    let mut lagged = Vec::with_capacity(2 * max_lag + 1);
    for lag in -(max_lag as i64)..=(max_lag as i64) {
        let k = lag.unsigned_abs() as usize;
        let r_opt = if lag > 0 {
            pearson(&a[..n - k], &b[k..])
        } else if lag < 0 {
            pearson(&a[k..], &b[..n - k])
        } else {
            pearson(&a, &b)
        };
        let correlation = match r_opt {
            Some(r) => r,
            None => {
                log::warn!(
                    "Correlation of '{}' and '{}' at lag {} is undefined, recording 0",
                    metric1,
                    metric2,
                    lag
                );
                0.0
            }
        };
        let p_value = pearson_p_value(correlation, n - k);
        lagged.push(LagCorrelation {
            lag,
            correlation,
            p_value,
            is_significant: p_value < LAG_SIGNIFICANCE_P,
        });
    }

    // First maximum wins, so ties resolve to the earliest lag
    let mut best = BestLag {
        lag: lagged[0].lag,
        correlation: lagged[0].correlation,
    };
    for entry in &lagged[1..] {
        if entry.correlation.abs() > best.correlation.abs() {
            best = BestLag {
                lag: entry.lag,
                correlation: entry.correlation,
            };
        }
    }

    let relationship = if best.lag > 0 {
        format!("{} leads {} by {} periods", metric1, metric2, best.lag)
    } else if best.lag < 0 {
        format!("{} leads {} by {} periods", metric2, metric1, -best.lag)
    } else {
        format!(
            "{} and {} are contemporaneously correlated",
            metric1, metric2
        )
    };

    Ok(LaggedCorrelationReport {
        metric1: metric1.to_string(),
        metric2: metric2.to_string(),
        lagged_correlations: lagged,
        best_lag: best,
        relationship,
        max_lag_tested: max_lag,
    })
}
