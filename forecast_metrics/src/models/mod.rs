//! Forecasting models for metric time series
//!
//! Each model consumes a [`PreparedSeries`] and produces in-sample fitted
//! values, future points with confidence bounds, and its fitted
//! parameters. The engine picks the model, evaluates accuracy against the
//! fitted values, and assembles the full report.

use crate::data::PreparedSeries;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;

pub mod exponential;
pub mod linear;
pub mod moving_average;
pub mod seasonal;

/// z multiplier for an 80% confidence interval
pub const Z_SCORE_80: f64 = 1.28;
/// z multiplier for a 90% confidence interval
pub const Z_SCORE_90: f64 = 1.645;
/// z multiplier for a 95% confidence interval
pub const Z_SCORE_95: f64 = 1.96;
/// z multiplier for a 99% confidence interval
pub const Z_SCORE_99: f64 = 2.576;
/// Fallback z multiplier for confidence levels outside the fixed table
pub const DEFAULT_Z_SCORE: f64 = Z_SCORE_95;

/// Percentage change beyond which a forecast counts as trending
pub const TREND_CHANGE_THRESHOLD_PCT: f64 = 5.0;

/// Map a confidence level onto its fixed z multiplier
pub fn z_score(confidence_level: f64) -> f64 {
    const TABLE: [(f64, f64); 4] = [
        (0.80, Z_SCORE_80),
        (0.90, Z_SCORE_90),
        (0.95, Z_SCORE_95),
        (0.99, Z_SCORE_99),
    ];
    for (level, z) in TABLE {
        if (confidence_level - level).abs() < 1e-9 {
            return z;
        }
    }
    DEFAULT_Z_SCORE
}

/// Forecasting method tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Pick a method from data size and seasonality
    Auto,
    /// Linear trend over elapsed days
    Linear,
    /// Rolling-mean continuation
    MovingAverage,
    /// Exponential smoothing continuation
    Exponential,
    /// Additive seasonal decomposition
    Seasonal,
}

impl ForecastMethod {
    /// Lowercase tag used in metadata and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::Auto => "auto",
            ForecastMethod::Linear => "linear",
            ForecastMethod::MovingAverage => "moving_average",
            ForecastMethod::Exponential => "exponential",
            ForecastMethod::Seasonal => "seasonal",
        }
    }
}

impl Default for ForecastMethod {
    fn default() -> Self {
        ForecastMethod::Auto
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ForecastMethod {
    type Err = crate::error::ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(ForecastMethod::Auto),
            "linear" => Ok(ForecastMethod::Linear),
            "moving_average" => Ok(ForecastMethod::MovingAverage),
            "exponential" => Ok(ForecastMethod::Exponential),
            "seasonal" => Ok(ForecastMethod::Seasonal),
            other => Err(crate::error::ForecastError::InvalidParameter(format!(
                "Unknown forecast method '{}'",
                other
            ))),
        }
    }
}

/// Overall direction of a value sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Values rise by more than the trend threshold
    Increasing,
    /// Values fall by more than the trend threshold
    Decreasing,
    /// Values stay within the trend threshold
    Stable,
}

impl Trend {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A forecasted point with its confidence bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Forecast timestamp (UTC)
    pub date: DateTime<Utc>,
    /// Point forecast
    pub forecast: f64,
    /// Lower confidence bound
    pub lower_bound: f64,
    /// Upper confidence bound
    pub upper_bound: f64,
}

/// An observed historical point echoed in reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoricalPoint {
    /// Observation timestamp (UTC)
    pub date: DateTime<Utc>,
    /// Observed value
    pub actual: f64,
}

/// Fitted parameters, one variant per method
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelParams {
    /// Linear trend parameters
    Linear {
        /// Fitted slope per day
        slope: f64,
        /// Fitted intercept
        intercept: f64,
        /// Coefficient of determination of the fit
        r_squared: f64,
    },
    /// Moving-average parameters
    MovingAverage {
        /// Rolling window length
        window: usize,
        /// Last rolling average, carried forward as the forecast
        last_average: f64,
    },
    /// Exponential-smoothing parameters
    Exponential {
        /// Smoothing factor
        alpha: f64,
        /// Last smoothed level, carried forward as the forecast
        last_smoothed: f64,
    },
    /// Seasonal-decomposition parameters
    Seasonal {
        /// Observations per seasonal cycle
        period: usize,
        /// Share of non-trend variation explained by the seasonal pattern
        seasonal_strength: f64,
    },
}

/// Output of a single model run
#[derive(Debug, Clone)]
pub struct ModelForecast {
    /// In-sample fitted values, aligned with the prepared series
    pub fitted: Vec<f64>,
    /// Future points with confidence bounds
    pub points: Vec<ForecastPoint>,
    /// Fitted parameters
    pub params: ModelParams,
}

/// Common interface for forecasting models
pub trait ForecastModel: Debug {
    /// Lowercase tag of the method this model implements
    fn name(&self) -> &'static str;

    /// Fit the series and forecast `periods` future points using the
    /// given z multiplier for interval width
    fn forecast(&self, series: &PreparedSeries, periods: usize, z: f64) -> Result<ModelForecast>;
}

/// Classify a forecast sequence with the two-point percentage-change rule
pub fn determine_trend(points: &[ForecastPoint]) -> Trend {
    if points.len() < 2 {
        return Trend::Stable;
    }
    let first = points[0].forecast;
    let last = points[points.len() - 1].forecast;
    let change_pct = if first != 0.0 {
        (last - first) / first.abs() * 100.0
    } else {
        0.0
    };

    if change_pct > TREND_CHANGE_THRESHOLD_PCT {
        Trend::Increasing
    } else if change_pct < -TREND_CHANGE_THRESHOLD_PCT {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}
