//! Seasonal decomposition forecasting
//!
//! Additive decomposition into trend, a repeating seasonal pattern, and
//! residuals. The trend is extrapolated by least squares and the pattern
//! repeated over the horizon. Needs two full cycles of data, otherwise the
//! engine falls back to the linear model.

use crate::data::PreparedSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastPoint, ModelForecast, ModelParams};
use metric_math::descriptive::population_std;
use metric_math::regression::SimpleRegression;
use metric_math::rolling::centered_moving_average;

/// Additive seasonal-decomposition model
#[derive(Debug, Default)]
pub struct SeasonalModel;

impl SeasonalModel {
    /// Create a seasonal decomposition model
    pub fn new() -> Self {
        SeasonalModel
    }
}

impl ForecastModel for SeasonalModel {
    fn name(&self) -> &'static str {
        "seasonal"
    }

    fn forecast(&self, series: &PreparedSeries, periods: usize, z: f64) -> Result<ModelForecast> {
        let values = series.values();
        let n = values.len();

        let period = series.frequency().seasonal_period().ok_or_else(|| {
            ForecastError::MethodUnavailable(format!(
                "No seasonal period defined for {} data",
                series.frequency()
            ))
        })?;
        if n < 2 * period {
            return Err(ForecastError::MethodUnavailable(format!(
                "Seasonal decomposition needs at least {} points for a period of {}, got {}",
                2 * period,
                period,
                n
            )));
        }

        let trend = centered_moving_average(&values, period);

        // Per-position means of the detrended series, recentered to sum zero
        let mut position_sums = vec![0.0; period];
        let mut position_counts = vec![0usize; period];
        for (i, (value, t)) in values.iter().zip(trend.iter()).enumerate() {
            position_sums[i % period] += value - t;
            position_counts[i % period] += 1;
        }
        let mut seasonal: Vec<f64> = position_sums
            .iter()
            .zip(position_counts.iter())
            .map(|(sum, count)| if *count > 0 { sum / *count as f64 } else { 0.0 })
            .collect();
        let seasonal_mean = seasonal.iter().sum::<f64>() / period as f64;
        for s in seasonal.iter_mut() {
            *s -= seasonal_mean;
        }

        let fitted: Vec<f64> = trend
            .iter()
            .enumerate()
            .map(|(i, t)| t + seasonal[i % period])
            .collect();
        let residuals: Vec<f64> = values
            .iter()
            .zip(fitted.iter())
            .map(|(v, f)| v - f)
            .collect();
        let residual_std = population_std(&residuals).unwrap_or(0.0);

        let indices: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let trend_fit = SimpleRegression::fit(&indices, &trend)?;

        let mut points = Vec::with_capacity(periods);
        for (h, date) in series.future_timestamps(periods).into_iter().enumerate() {
            let horizon = h + 1;
            let future_index = (n - 1 + horizon) as f64;
            let forecast = trend_fit.predict(future_index) + seasonal[(n + h) % period];
            // Uncertainty grows with each cycle the forecast extends past
            // the observed data
            let margin =
                z * residual_std * (1.0 + horizon as f64 / period as f64).sqrt();
            points.push(ForecastPoint {
                date,
                forecast,
                lower_bound: forecast - margin,
                upper_bound: forecast + margin,
            });
        }

        let seasonal_strength = {
            let pattern: Vec<f64> = values
                .iter()
                .enumerate()
                .map(|(i, _)| seasonal[i % period])
                .collect();
            let combined: Vec<f64> = pattern
                .iter()
                .zip(residuals.iter())
                .map(|(s, r)| s + r)
                .collect();
            let resid_var = population_std(&residuals).map(|s| s * s).unwrap_or(0.0);
            let combined_var = population_std(&combined).map(|s| s * s).unwrap_or(0.0);
            if combined_var > 0.0 {
                (1.0 - resid_var / combined_var).max(0.0)
            } else {
                0.0
            }
        };

        Ok(ModelForecast {
            fitted,
            points,
            params: ModelParams::Seasonal {
                period,
                seasonal_strength,
            },
        })
    }
}
