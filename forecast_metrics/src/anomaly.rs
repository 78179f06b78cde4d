//! Anomaly detection for metric time series
//!
//! Flags points that sit strictly outside a rolling band around the local
//! level. The band half-width is the local rolling spread scaled by a
//! caller-chosen sensitivity.

use crate::data::DataPreparer;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use metric_math::descriptive::sample_std;
use metric_math::rolling::{
    centered_rolling_mean, centered_rolling_std, fill_backward, fill_forward,
};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fmt;

/// Least permissive accepted sensitivity
pub const MIN_SENSITIVITY: f64 = 1.0;
/// Most permissive accepted sensitivity
pub const MAX_SENSITIVITY: f64 = 5.0;
/// Largest rolling window used for the local band
pub const MAX_ANOMALY_WINDOW: usize = 7;

/// Side of the band an anomalous point fell on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyType {
    /// Above the upper bound
    High,
    /// Below the lower bound
    Low,
}

impl AnomalyType {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::High => "high",
            AnomalyType::Low => "low",
        }
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A point flagged as anomalous
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    /// Timestamp of the flagged point
    pub date: DateTime<Utc>,
    /// Observed value
    pub value: f64,
    /// Local rolling mean at this point
    pub expected_value: f64,
    /// Which bound was crossed
    #[serde(rename = "type")]
    pub kind: AnomalyType,
    /// Distance from the local mean in local standard deviations
    pub deviation_score: f64,
    /// Lower edge of the acceptance band
    pub lower_bound: f64,
    /// Upper edge of the acceptance band
    pub upper_bound: f64,
}

/// Detect anomalies in a metric column against a time column.
///
/// The series is prepared as for forecasting. Each point is compared
/// against a centered rolling mean (edges filled from the nearest
/// computed value) plus or minus `sensitivity` centered rolling standard
/// deviations (undefined windows fall back to the overall spread). Points
/// strictly outside the band are returned in chronological order.
pub fn detect_anomalies(
    df: &DataFrame,
    time_column: &str,
    metric_column: &str,
    sensitivity: f64,
) -> Result<Vec<AnomalyRecord>> {
    if !(MIN_SENSITIVITY..=MAX_SENSITIVITY).contains(&sensitivity) {
        return Err(ForecastError::InvalidParameter(format!(
            "sensitivity must be between {} and {}, got {}",
            MIN_SENSITIVITY, MAX_SENSITIVITY, sensitivity
        )));
    }

    let series = DataPreparer::prepare(df, time_column, metric_column)?;
    let values = series.values();
    let window = MAX_ANOMALY_WINDOW.min(values.len() / 3).max(1);

    let mut means = centered_rolling_mean(&values, window);
    fill_backward(&mut means);
    fill_forward(&mut means);

    let mut stds = centered_rolling_std(&values, window);
    let overall_std = sample_std(&values).unwrap_or(0.0);
    for s in stds.iter_mut() {
        if !s.is_finite() {
            *s = overall_std;
        }
    }

    let mut anomalies = Vec::new();
    for (point, (mean, std)) in series
        .points()
        .iter()
        .zip(means.iter().zip(stds.iter()))
    {
        let margin = sensitivity * std;
        let lower_bound = mean - margin;
        let upper_bound = mean + margin;
        if point.value > upper_bound || point.value < lower_bound {
            let deviation_score = if *std > 0.0 {
                (point.value - mean).abs() / std
            } else {
                0.0
            };
            anomalies.push(AnomalyRecord {
                date: point.timestamp,
                value: point.value,
                expected_value: *mean,
                kind: if point.value > upper_bound {
                    AnomalyType::High
                } else {
                    AnomalyType::Low
                },
                deviation_score,
                lower_bound,
                upper_bound,
            });
        }
    }

    Ok(anomalies)
}
