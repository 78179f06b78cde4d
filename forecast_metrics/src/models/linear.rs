//! Linear trend forecasting
//!
//! Ordinary least squares of metric value against elapsed days, with
//! prediction intervals that widen the further a forecast sits from the
//! center of the observed window.

use crate::data::PreparedSeries;
use crate::error::Result;
use crate::models::{ForecastModel, ForecastPoint, ModelForecast, ModelParams};
use metric_math::descriptive::population_std;
use metric_math::regression::SimpleRegression;

/// Least-squares trend over elapsed days
#[derive(Debug, Default)]
pub struct LinearModel;

impl LinearModel {
    /// Create a linear trend model
    pub fn new() -> Self {
        LinearModel
    }
}

impl ForecastModel for LinearModel {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn forecast(&self, series: &PreparedSeries, periods: usize, z: f64) -> Result<ModelForecast> {
        let values = series.values();
        let days = series.elapsed_days();
        let n = values.len();

        let regression = SimpleRegression::fit(&days, &values)?;
        let fitted = regression.fitted(&days);

        let residuals: Vec<f64> = values
            .iter()
            .zip(fitted.iter())
            .map(|(v, f)| v - f)
            .collect();
        let residual_std = population_std(&residuals).unwrap_or(0.0);

        let first = series.points()[0].timestamp;
        let mut points = Vec::with_capacity(periods);
        for date in series.future_timestamps(periods) {
            let day = (date - first).num_milliseconds() as f64 / 86_400_000.0;
            let forecast = regression.predict(day);
            // Prediction interval for a new observation at this x
            let margin = z
                * residual_std
                * (1.0
                    + 1.0 / n as f64
                    + (day - regression.x_mean).powi(2) / regression.x_sum_sq)
                    .sqrt();
            points.push(ForecastPoint {
                date,
                forecast,
                lower_bound: forecast - margin,
                upper_bound: forecast + margin,
            });
        }

        Ok(ModelForecast {
            fitted,
            points,
            params: ModelParams::Linear {
                slope: regression.slope,
                intercept: regression.intercept,
                r_squared: regression.r_squared,
            },
        })
    }
}
