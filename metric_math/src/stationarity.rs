//! Dickey-Fuller stationarity test
//!
//! Lag-0 Dickey-Fuller with a constant term: regress the first difference
//! on the lagged level and take the t statistic of the level coefficient.
//! A strongly negative statistic rejects the unit root (the series reverts
//! to a mean); a statistic near zero or positive means the series keeps
//! wandering or trending.
//!
//! P-values are bucketed against the standard critical values for the
//! constant-only case rather than interpolated.

use crate::regression::SimpleRegression;
use crate::{MathError, Result};
use serde::Serialize;

/// 1% critical value for the constant-only Dickey-Fuller test
pub const ADF_CRITICAL_1PCT: f64 = -3.43;
/// 5% critical value
pub const ADF_CRITICAL_5PCT: f64 = -2.86;
/// 10% critical value
pub const ADF_CRITICAL_10PCT: f64 = -2.57;

/// Minimum observations for a meaningful test
pub const ADF_MIN_OBSERVATIONS: usize = 10;

/// Outcome of a Dickey-Fuller test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdfResult {
    /// The t statistic of the lagged-level coefficient
    pub statistic: f64,
    /// Bucketed p-value (0.01, 0.025, 0.075 or 0.20)
    pub p_value: f64,
    /// Whether the unit root is rejected at the 5% level
    pub is_stationary: bool,
}

/// Run the Dickey-Fuller test on a series
pub fn adf_test(values: &[f64]) -> Result<AdfResult> {
    if values.len() < ADF_MIN_OBSERVATIONS {
        return Err(MathError::InsufficientData(format!(
            "Stationarity test needs at least {} observations, got {}",
            ADF_MIN_OBSERVATIONS,
            values.len()
        )));
    }

    let pairs = values.len() - 1;
    let lagged = &values[..pairs];
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let fit = SimpleRegression::fit(lagged, &diffs)?;
    let ss_residual: f64 = lagged
        .iter()
        .zip(diffs.iter())
        .map(|(&x, &y)| {
            let r = y - fit.predict(x);
            r * r
        })
        .sum();

    let df = (pairs - 2) as f64;
    let se = (ss_residual / df / fit.x_sum_sq).sqrt();
    let statistic = if se < 1e-12 {
        // Perfect fit: the sign of the coefficient decides outright
        if fit.slope.abs() < 1e-12 {
            0.0
        } else if fit.slope < 0.0 {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }
    } else {
        fit.slope / se
    };

    let p_value = bucketed_p_value(statistic);
    Ok(AdfResult {
        statistic,
        p_value,
        is_stationary: p_value < 0.05,
    })
}

/// Map a test statistic onto the critical-value buckets. The 5% bucket
/// reports 0.025 so that `p < 0.05` agrees with `statistic < -2.86`.
fn bucketed_p_value(statistic: f64) -> f64 {
    if statistic < ADF_CRITICAL_1PCT {
        0.01
    } else if statistic < ADF_CRITICAL_5PCT {
        0.025
    } else if statistic < ADF_CRITICAL_10PCT {
        0.075
    } else {
        0.20
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_series_is_not_stationary() {
        let values: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        let result = adf_test(&values).unwrap();
        assert!(!result.is_stationary);
        assert!(result.p_value >= 0.05);
    }

    #[test]
    fn test_perfectly_mean_reverting_series_is_stationary() {
        let values: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 5.0 } else { -5.0 }).collect();
        let result = adf_test(&values).unwrap();
        assert!(result.is_stationary);
        assert!((result.p_value - 0.01).abs() < 1e-10);
    }

    #[test]
    fn test_noisy_mean_reverting_series_is_stationary() {
        let values = vec![2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 2.0];
        let result = adf_test(&values).unwrap();
        assert!(result.is_stationary);
        assert!(result.p_value < 0.05);
    }

    #[test]
    fn test_short_series_is_rejected() {
        let values = vec![1.0, 2.0, 3.0];
        assert!(adf_test(&values).is_err());
    }
}
