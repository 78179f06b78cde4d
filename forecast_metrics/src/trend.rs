//! Trend strength analysis
//!
//! Regresses a metric against elapsed time and grades how much of the
//! variation the fitted line explains.

use crate::data::DataPreparer;
use crate::error::Result;
use crate::models::Trend;
use metric_math::regression::SimpleRegression;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fmt;

/// R² above which a trend counts as strong
pub const STRONG_TREND_R_SQUARED: f64 = 0.7;
/// R² above which a trend counts as moderate
pub const MODERATE_TREND_R_SQUARED: f64 = 0.4;
/// Slope magnitude at or below which the direction reads as stable
pub const FLAT_SLOPE_TOLERANCE: f64 = 1e-12;

/// How much of the variation the fitted trend line explains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    /// R² at or below the moderate threshold
    Weak,
    /// R² above the moderate threshold
    Moderate,
    /// R² above the strong threshold
    Strong,
}

impl TrendStrength {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendStrength::Weak => "weak",
            TrendStrength::Moderate => "moderate",
            TrendStrength::Strong => "strong",
        }
    }
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fitted trend line and its grading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    /// Direction of the fitted slope
    pub direction: Trend,
    /// Grade of the fit
    pub strength: TrendStrength,
    /// Fitted slope per day
    pub slope: f64,
    /// Coefficient of determination of the fit
    pub r_squared: f64,
    /// Change from first to last observation, in percent
    pub percentage_change: f64,
    /// First observed value
    pub start_value: f64,
    /// Last observed value
    pub end_value: f64,
    /// Span of the series in fractional days
    pub time_period_days: f64,
}

/// Fit a trend line to a metric column and grade its direction and
/// strength.
pub fn trend_strength(
    df: &DataFrame,
    time_column: &str,
    metric_column: &str,
) -> Result<TrendSummary> {
    let series = DataPreparer::prepare(df, time_column, metric_column)?;
    let values = series.values();
    let days = series.elapsed_days();

    let regression = SimpleRegression::fit(&days, &values)?;

    let direction = if regression.slope.abs() <= FLAT_SLOPE_TOLERANCE {
        Trend::Stable
    } else if regression.slope > 0.0 {
        Trend::Increasing
    } else {
        Trend::Decreasing
    };

    let strength = if regression.r_squared > STRONG_TREND_R_SQUARED {
        TrendStrength::Strong
    } else if regression.r_squared > MODERATE_TREND_R_SQUARED {
        TrendStrength::Moderate
    } else {
        TrendStrength::Weak
    };

    let start_value = values[0];
    let end_value = values[values.len() - 1];
    let percentage_change = if start_value != 0.0 {
        (end_value - start_value) / start_value.abs() * 100.0
    } else {
        0.0
    };
    let time_period_days = days.last().copied().unwrap_or(0.0);

    Ok(TrendSummary {
        direction,
        strength,
        slope: regression.slope,
        r_squared: regression.r_squared,
        percentage_change,
        start_value,
        end_value,
        time_period_days,
    })
}
