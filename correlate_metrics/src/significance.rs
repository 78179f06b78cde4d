//! Significance testing for a single correlation
//!
//! Exact two-sided t test plus a Fisher z-transform confidence interval.

use crate::error::{CorrelationError, Result};
use crate::measures::{correlation_t, pearson_p_value};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Confidence interval for a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Confidence level (1 - alpha)
    pub level: f64,
}

/// Outcome of testing a correlation against zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignificanceReport {
    /// Tested coefficient
    pub correlation: f64,
    /// Number of observations behind the coefficient
    pub sample_size: usize,
    /// t statistic, infinite for a perfect correlation
    pub t_statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Whether the p-value clears alpha
    pub is_significant: bool,
    /// Fisher z-transform interval
    pub confidence_interval: ConfidenceInterval,
}

/// Test whether a correlation over `sample_size` observations differs
/// from zero at level `alpha`.
pub fn correlation_significance(
    correlation: f64,
    sample_size: usize,
    alpha: f64,
) -> Result<SignificanceReport> {
    if !(-1.0..=1.0).contains(&correlation) {
        return Err(CorrelationError::InvalidParameter(format!(
            "correlation must be between -1 and 1, got {}",
            correlation
        )));
    }
    if sample_size < 3 {
        return Err(CorrelationError::InsufficientData(format!(
            "Need at least 3 observations to test a correlation, got {}",
            sample_size
        )));
    }
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(CorrelationError::InvalidParameter(format!(
            "alpha must be strictly between 0 and 1, got {}",
            alpha
        )));
    }

    let t_statistic = correlation_t(correlation, sample_size);
    let p_value = pearson_p_value(correlation, sample_size);
    let confidence_interval = fisher_interval(correlation, sample_size, alpha)?;

    Ok(SignificanceReport {
        correlation,
        sample_size,
        t_statistic,
        p_value,
        is_significant: p_value < alpha,
        confidence_interval,
    })
}

/// Fisher z-transform interval. A perfect correlation collapses to a
/// point; n = 3 leaves the standard error undefined and returns the
/// whole (-1, 1) range.
fn fisher_interval(r: f64, n: usize, alpha: f64) -> Result<ConfidenceInterval> {
    let level = 1.0 - alpha;
    if r.abs() >= 1.0 {
        return Ok(ConfidenceInterval {
            lower: r,
            upper: r,
            level,
        });
    }
    if n < 4 {
        return Ok(ConfidenceInterval {
            lower: -1.0,
            upper: 1.0,
            level,
        });
    }

    let z = r.atanh();
    let se = 1.0 / ((n - 3) as f64).sqrt();
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| CorrelationError::DataError(e.to_string()))?;
    let z_critical = normal.inverse_cdf(1.0 - alpha / 2.0);

    Ok(ConfidenceInterval {
        lower: (z - z_critical * se).tanh(),
        upper: (z + z_critical * se).tanh(),
        level,
    })
}
