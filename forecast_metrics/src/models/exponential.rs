//! Exponential smoothing forecasting
//!
//! Single exponential smoothing with a fixed smoothing factor. The last
//! smoothed level is carried forward as a flat forecast.

use crate::data::PreparedSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastPoint, ModelForecast, ModelParams};
use metric_math::descriptive::population_std;

/// Fixed smoothing factor
pub const SMOOTHING_ALPHA: f64 = 0.3;

/// Single-exponential-smoothing model
#[derive(Debug, Default)]
pub struct ExponentialModel;

impl ExponentialModel {
    /// Create an exponential smoothing model
    pub fn new() -> Self {
        ExponentialModel
    }
}

/// Smooth a value sequence, seeding the level with the first observation
pub fn smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut smoothed = Vec::with_capacity(values.len());
    let mut level = match values.first() {
        Some(v) => *v,
        None => return smoothed,
    };
    smoothed.push(level);
    for value in &values[1..] {
        level = alpha * value + (1.0 - alpha) * level;
        smoothed.push(level);
    }
    smoothed
}

impl ForecastModel for ExponentialModel {
    fn name(&self) -> &'static str {
        "exponential"
    }

    fn forecast(&self, series: &PreparedSeries, periods: usize, z: f64) -> Result<ModelForecast> {
        let values = series.values();
        let fitted = smooth(&values, SMOOTHING_ALPHA);

        let last_smoothed = *fitted.last().ok_or_else(|| {
            ForecastError::InsufficientData("Cannot forecast an empty series".to_string())
        })?;

        let residuals: Vec<f64> = values
            .iter()
            .zip(fitted.iter())
            .map(|(v, s)| v - s)
            .collect();
        let margin = z * population_std(&residuals).unwrap_or(0.0);

        let points = series
            .future_timestamps(periods)
            .into_iter()
            .map(|date| ForecastPoint {
                date,
                forecast: last_smoothed,
                lower_bound: last_smoothed - margin,
                upper_bound: last_smoothed + margin,
            })
            .collect();

        Ok(ModelForecast {
            fitted,
            points,
            params: ModelParams::Exponential {
                alpha: SMOOTHING_ALPHA,
                last_smoothed,
            },
        })
    }
}
