//! Forecast orchestration
//!
//! [`ForecastEngine`] ties the pipeline together: prepare the series,
//! resolve the method, run the model, evaluate in-sample accuracy, and
//! assemble the report. The engine itself holds only the seasonal
//! capability flag, so a single instance can be shared across threads.

use crate::accuracy::{evaluate_accuracy, AccuracyMetrics};
use crate::data::{DataPreparer, PreparedSeries, SampleFrequency};
use crate::error::{ForecastError, Result};
use crate::models::exponential::ExponentialModel;
use crate::models::linear::LinearModel;
use crate::models::moving_average::MovingAverageModel;
use crate::models::seasonal::SeasonalModel;
use crate::models::{
    determine_trend, z_score, ForecastMethod, ForecastModel, ForecastPoint, HistoricalPoint,
    ModelParams, Trend,
};
use metric_math::correlation::autocorrelation;
use polars::prelude::DataFrame;
use serde::Serialize;

/// Largest accepted forecast horizon
pub const MAX_FORECAST_PERIODS: usize = 365;
/// Default forecast horizon
pub const DEFAULT_FORECAST_PERIODS: usize = 30;
/// Default confidence level for forecast intervals
pub const DEFAULT_CONFIDENCE_INTERVAL: f64 = 0.95;

/// Minimum series length for auto-selecting the linear model
pub const LINEAR_SELECTION_MIN_POINTS: usize = 10;
/// Minimum series length for auto-selecting the seasonal model
pub const SEASONAL_SELECTION_MIN_POINTS: usize = 20;
/// Minimum series length for seasonality detection
pub const SEASONALITY_MIN_POINTS: usize = 14;
/// Autocorrelation magnitude above which a lag counts as seasonal
pub const SEASONALITY_AUTOCORR_THRESHOLD: f64 = 0.5;

/// Forecast request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Number of future points to produce, 1 to [`MAX_FORECAST_PERIODS`]
    pub periods: usize,
    /// Requested method, resolved at run time when `Auto`
    pub method: ForecastMethod,
    /// Confidence level for interval bounds, strictly between 0 and 1
    pub confidence_interval: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            periods: DEFAULT_FORECAST_PERIODS,
            method: ForecastMethod::Auto,
            confidence_interval: DEFAULT_CONFIDENCE_INTERVAL,
        }
    }
}

impl ForecastConfig {
    /// Check the parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.periods < 1 || self.periods > MAX_FORECAST_PERIODS {
            return Err(ForecastError::InvalidParameter(format!(
                "periods must be between 1 and {}, got {}",
                MAX_FORECAST_PERIODS, self.periods
            )));
        }
        if !(self.confidence_interval > 0.0 && self.confidence_interval < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence_interval must be strictly between 0 and 1, got {}",
                self.confidence_interval
            )));
        }
        Ok(())
    }
}

/// Context echoed alongside every forecast.
///
/// Carries no timestamps, so identical inputs serialize to identical
/// reports.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastMetadata {
    /// Method that actually ran
    pub method: ForecastMethod,
    /// Method the caller asked for
    pub requested_method: ForecastMethod,
    /// Requested horizon
    pub periods: usize,
    /// Requested confidence level
    pub confidence_interval: f64,
    /// Cleaned historical points used for fitting
    pub historical_points: usize,
    /// Forecast points produced
    pub forecast_points: usize,
    /// Inferred sampling frequency
    pub frequency: SampleFrequency,
    /// Degradations applied while producing the forecast
    pub warnings: Vec<String>,
}

/// Complete forecast report
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    /// Cleaned history echoed back
    pub historical: Vec<HistoricalPoint>,
    /// Future points with confidence bounds
    pub forecast: Vec<ForecastPoint>,
    /// In-sample accuracy of the fitted model
    pub accuracy: AccuracyMetrics,
    /// Direction of the forecast, from the two-point rule
    pub trend: Trend,
    /// Method that actually ran
    pub method: ForecastMethod,
    /// Fitted model parameters
    pub model_params: ModelParams,
    /// Request context and warnings
    pub metadata: ForecastMetadata,
}

/// Stateless forecasting engine
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    seasonal_enabled: bool,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        ForecastEngine::new()
    }
}

impl ForecastEngine {
    /// Engine with seasonal forecasting available
    pub fn new() -> Self {
        ForecastEngine {
            seasonal_enabled: true,
        }
    }

    /// Engine with the seasonal capability toggled explicitly
    pub fn with_seasonal(seasonal_enabled: bool) -> Self {
        ForecastEngine { seasonal_enabled }
    }

    /// Forecast a metric column against a time column.
    ///
    /// Prepares the series, resolves `Auto` to a concrete method, runs the
    /// model, and assembles the report. An unavailable seasonal model
    /// degrades to linear with a warning instead of failing.
    pub fn forecast(
        &self,
        df: &DataFrame,
        time_column: &str,
        metric_column: &str,
        config: &ForecastConfig,
    ) -> Result<ForecastResult> {
        config.validate()?;
        let series = DataPreparer::prepare(df, time_column, metric_column)?;
        let z = z_score(config.confidence_interval);

        let mut warnings = Vec::new();
        let resolved = self.resolve_method(config.method, &series, &mut warnings);
        let model: Box<dyn ForecastModel> = match resolved {
            ForecastMethod::Seasonal => Box::new(SeasonalModel::new()),
            ForecastMethod::Exponential => Box::new(ExponentialModel::new()),
            ForecastMethod::MovingAverage => Box::new(MovingAverageModel::new()),
            // Auto is resolved to a concrete method above
            ForecastMethod::Linear | ForecastMethod::Auto => Box::new(LinearModel::new()),
        };

        let (method, output) = match model.forecast(&series, config.periods, z) {
            Ok(output) => (resolved, output),
            Err(ForecastError::MethodUnavailable(reason)) => {
                let warning = format!("{}; falling back to linear", reason);
                log::warn!("{}", warning);
                warnings.push(warning);
                let fallback = LinearModel::new().forecast(&series, config.periods, z)?;
                (ForecastMethod::Linear, fallback)
            }
            Err(e) => return Err(e),
        };

        let accuracy = evaluate_accuracy(&series.values(), &output.fitted)?;
        let trend = determine_trend(&output.points);
        let historical: Vec<HistoricalPoint> = series
            .points()
            .iter()
            .map(|p| HistoricalPoint {
                date: p.timestamp,
                actual: p.value,
            })
            .collect();

        let metadata = ForecastMetadata {
            method,
            requested_method: config.method,
            periods: config.periods,
            confidence_interval: config.confidence_interval,
            historical_points: series.len(),
            forecast_points: output.points.len(),
            frequency: series.frequency(),
            warnings,
        };

        Ok(ForecastResult {
            historical,
            forecast: output.points,
            accuracy,
            trend,
            method,
            model_params: output.params,
            metadata,
        })
    }

    fn resolve_method(
        &self,
        requested: ForecastMethod,
        series: &PreparedSeries,
        warnings: &mut Vec<String>,
    ) -> ForecastMethod {
        match requested {
            ForecastMethod::Auto => self.select_method(series),
            ForecastMethod::Seasonal if !self.seasonal_enabled => {
                let warning =
                    "Seasonal forecasting is disabled; falling back to linear".to_string();
                log::warn!("{}", warning);
                warnings.push(warning);
                ForecastMethod::Linear
            }
            other => other,
        }
    }

    fn select_method(&self, series: &PreparedSeries) -> ForecastMethod {
        let n = series.len();
        if n >= SEASONAL_SELECTION_MIN_POINTS
            && self.seasonal_enabled
            && detect_seasonality(&series.values())
        {
            ForecastMethod::Seasonal
        } else if n >= LINEAR_SELECTION_MIN_POINTS {
            ForecastMethod::Linear
        } else {
            ForecastMethod::MovingAverage
        }
    }
}

/// Check a series for a repeating pattern at weekly or monthly lags.
///
/// Looks at the autocorrelation at lag 7 and at lag `min(30, n/2)`; either
/// exceeding the threshold in magnitude counts as seasonal. Series shorter
/// than [`SEASONALITY_MIN_POINTS`] never count.
pub fn detect_seasonality(values: &[f64]) -> bool {
    if values.len() < SEASONALITY_MIN_POINTS {
        return false;
    }
    let long_lag = 30.min(values.len() / 2);
    for lag in [7, long_lag] {
        if let Some(r) = autocorrelation(values, lag) {
            if r.abs() > SEASONALITY_AUTOCORR_THRESHOLD {
                return true;
            }
        }
    }
    false
}
