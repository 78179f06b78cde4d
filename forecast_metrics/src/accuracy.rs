//! Accuracy metrics for evaluating forecasts against actual values

use crate::error::{ForecastError, Result};
use serde::Serialize;

/// Forecast accuracy metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error (points with actual = 0 excluded)
    pub mape: f64,
    /// Coefficient of determination (0 when actuals have no variance)
    pub r_squared: f64,
}

impl AccuracyMetrics {
    /// All-zero metrics, reported when no finite pairs remain
    pub fn zeroed() -> Self {
        Self {
            mae: 0.0,
            rmse: 0.0,
            mape: 0.0,
            r_squared: 0.0,
        }
    }
}

impl std::fmt::Display for AccuracyMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:     {:.4}", self.mae)?;
        writeln!(f, "  RMSE:    {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:    {:.4}%", self.mape)?;
        writeln!(f, "  R2:      {:.4}", self.r_squared)?;
        Ok(())
    }
}

/// Evaluate accuracy metrics between actual and predicted values.
///
/// Pairs where either side is non-finite are masked out of every metric.
/// An empty mask yields all-zero metrics rather than NaN.
pub fn evaluate_accuracy(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::InvalidParameter(
            "Actual and predicted values must have the same length".to_string(),
        ));
    }

    let pairs: Vec<(f64, f64)> = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| a.is_finite() && p.is_finite())
        .map(|(&a, &p)| (a, p))
        .collect();

    if pairs.is_empty() {
        return Ok(AccuracyMetrics::zeroed());
    }

    let n = pairs.len() as f64;
    let mae = pairs.iter().map(|(a, p)| (a - p).abs()).sum::<f64>() / n;
    let rmse = (pairs.iter().map(|(a, p)| (a - p).powi(2)).sum::<f64>() / n).sqrt();

    let non_zero: Vec<&(f64, f64)> = pairs.iter().filter(|(a, _)| *a != 0.0).collect();
    let mape = if non_zero.is_empty() {
        0.0
    } else {
        non_zero
            .iter()
            .map(|(a, p)| ((a - p) / a).abs())
            .sum::<f64>()
            / non_zero.len() as f64
            * 100.0
    };

    let actual_mean = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let ss_res: f64 = pairs.iter().map(|(a, p)| (a - p).powi(2)).sum();
    let ss_tot: f64 = pairs.iter().map(|(a, _)| (a - actual_mean).powi(2)).sum();
    let r_squared = if ss_tot == 0.0 { 0.0 } else { 1.0 - ss_res / ss_tot };

    Ok(AccuracyMetrics {
        mae,
        rmse,
        mape,
        r_squared,
    })
}
