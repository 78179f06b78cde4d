//! Moving-average forecasting
//!
//! Continues the last trailing rolling mean across the whole horizon.
//! Suited to short series where fitting a trend would overreact to noise.

use crate::data::PreparedSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastPoint, ModelForecast, ModelParams};
use metric_math::descriptive::sample_std;
use metric_math::rolling::{rolling_mean, rolling_std};

/// Largest rolling window the model will use
pub const MAX_WINDOW: usize = 7;

/// Rolling-mean continuation model
#[derive(Debug, Default)]
pub struct MovingAverageModel;

impl MovingAverageModel {
    /// Create a moving-average model
    pub fn new() -> Self {
        MovingAverageModel
    }
}

impl ForecastModel for MovingAverageModel {
    fn name(&self) -> &'static str {
        "moving_average"
    }

    fn forecast(&self, series: &PreparedSeries, periods: usize, z: f64) -> Result<ModelForecast> {
        let values = series.values();
        let n = values.len();
        let window = MAX_WINDOW.min(n / 2).max(1);

        let fitted = rolling_mean(&values, window, 1);
        let stds = rolling_std(&values, window, 1);

        let last_average = *fitted.last().ok_or_else(|| {
            ForecastError::InsufficientData("Cannot forecast an empty series".to_string())
        })?;
        // A too-short tail leaves the rolling std undefined, fall back to
        // the spread of the whole series
        let last_std = match stds.last() {
            Some(s) if s.is_finite() => *s,
            _ => sample_std(&values).unwrap_or(0.0),
        };
        let margin = z * last_std;

        let points = series
            .future_timestamps(periods)
            .into_iter()
            .map(|date| ForecastPoint {
                date,
                forecast: last_average,
                lower_bound: last_average - margin,
                upper_bound: last_average + margin,
            })
            .collect();

        Ok(ModelForecast {
            fitted,
            points,
            params: ModelParams::MovingAverage {
                window,
                last_average,
            },
        })
    }
}
