//! Correlation coefficients and their p-values
//!
//! Pearson works on raw values, Spearman on mid-ranks, Kendall as tau-b
//! with tie correction. Pearson and Spearman are tested with the exact
//! two-sided t test; Kendall with the standard normal approximation.

use crate::error::{CorrelationError, Result};
use metric_math::correlation::{pearson, rank_mid};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use std::fmt;
use std::str::FromStr;

/// Correlation coefficient family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Linear correlation of raw values
    Pearson,
    /// Pearson over mid-ranks
    Spearman,
    /// Kendall tau-b with tie correction
    Kendall,
}

impl CorrelationMethod {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "pearson",
            CorrelationMethod::Spearman => "spearman",
            CorrelationMethod::Kendall => "kendall",
        }
    }
}

impl Default for CorrelationMethod {
    fn default() -> Self {
        CorrelationMethod::Pearson
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CorrelationMethod {
    type Err = CorrelationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pearson" => Ok(CorrelationMethod::Pearson),
            "spearman" => Ok(CorrelationMethod::Spearman),
            "kendall" => Ok(CorrelationMethod::Kendall),
            other => Err(CorrelationError::InvalidParameter(format!(
                "Unknown correlation method '{}'",
                other
            ))),
        }
    }
}

/// Coefficient for a pair of equal-length series, by method.
///
/// `None` when the coefficient is undefined (mismatched or too-short
/// input, or zero variance on either side).
pub fn correlation(method: CorrelationMethod, x: &[f64], y: &[f64]) -> Option<f64> {
    match method {
        CorrelationMethod::Pearson => pearson(x, y),
        CorrelationMethod::Spearman => spearman(x, y),
        CorrelationMethod::Kendall => kendall_tau_b(x, y),
    }
}

/// Two-sided p-value for a coefficient over n observations, by method
pub fn p_value(method: CorrelationMethod, coefficient: f64, n: usize) -> f64 {
    match method {
        CorrelationMethod::Pearson | CorrelationMethod::Spearman => {
            pearson_p_value(coefficient, n)
        }
        CorrelationMethod::Kendall => kendall_p_value(coefficient, n),
    }
}

/// Spearman rank correlation
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    pearson(&rank_mid(x), &rank_mid(y))
}

/// Kendall tau-b, correcting the denominator for ties on either side
pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    for i in 0..n {
        for j in i + 1..n {
            let sx = cmp_sign(x[i], x[j]);
            let sy = cmp_sign(y[i], y[j]);
            match sx * sy {
                s if s > 0 => concordant += 1,
                s if s < 0 => discordant += 1,
                _ => {}
            }
        }
    }

    let n0 = (n as i64) * (n as i64 - 1) / 2;
    let n1 = tie_correction(x);
    let n2 = tie_correction(y);
    let denom = ((n0 - n1) as f64 * (n0 - n2) as f64).sqrt();
    if denom <= 0.0 {
        return None;
    }
    Some((concordant - discordant) as f64 / denom)
}

fn cmp_sign(a: f64, b: f64) -> i64 {
    if a > b {
        1
    } else if a < b {
        -1
    } else {
        0
    }
}

fn tie_correction(values: &[f64]) -> i64 {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut total = 0i64;
    let mut run = 1i64;
    for w in sorted.windows(2) {
        if w[0] == w[1] {
            run += 1;
        } else {
            total += run * (run - 1) / 2;
            run = 1;
        }
    }
    total + run * (run - 1) / 2
}

/// t statistic for testing a correlation against zero.
///
/// Infinite for a perfect correlation.
pub fn correlation_t(r: f64, n: usize) -> f64 {
    if r.abs() >= 1.0 {
        return if r > 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
    }
    r * (n as f64 - 2.0).sqrt() / (1.0 - r * r).sqrt()
}

/// Two-sided p-value for a Pearson or Spearman coefficient via the t
/// distribution with n - 2 degrees of freedom
pub fn pearson_p_value(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * df.sqrt() / (1.0 - r * r).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
        Err(_) => 1.0,
    }
}

/// Two-sided p-value for a Kendall tau via the normal approximation
pub fn kendall_p_value(tau: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }
    let nf = n as f64;
    let z = 3.0 * tau * (nf * (nf - 1.0)).sqrt() / (2.0 * (2.0 * nf + 5.0)).sqrt();
    match Normal::new(0.0, 1.0) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(z.abs())),
        Err(_) => 1.0,
    }
}
