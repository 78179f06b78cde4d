//! Spurious correlation screening
//!
//! A high correlation between two trending series often reflects the
//! shared trend rather than any relationship. Each strongly correlated
//! pair is screened with a stationarity test on both sides; pairs where
//! both fail are flagged.

use crate::analyzer::{build_matrices, CorrelationMatrix};
use crate::dataset::NumericTable;
use crate::error::{CorrelationError, Result};
use crate::measures::CorrelationMethod;
use metric_math::stationarity::adf_test;
use polars::prelude::DataFrame;
use serde::Serialize;

/// |r| at or above which a pair is screened
pub const SPURIOUS_CORRELATION_THRESHOLD: f64 = 0.7;
/// p-value below which the pair's correlation counts as established
pub const SPURIOUS_MAX_P_VALUE: f64 = 0.05;

const SPURIOUS_REASON: &str = "Both variables are non-stationary (trending)";
const SPURIOUS_WARNING: &str = "Correlation may be spurious - consider differencing or detrending";

/// A strongly correlated pair where both sides are trending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpuriousFlag {
    /// First variable of the pair
    pub variable1: String,
    /// Second variable of the pair
    pub variable2: String,
    /// The suspect correlation
    pub correlation: f64,
    /// Why the pair was flagged
    pub reason: String,
    /// Stationarity test p-value of the first variable
    pub adf_pvalue1: f64,
    /// Stationarity test p-value of the second variable
    pub adf_pvalue2: f64,
    /// Caution for the reader
    pub warning: String,
}

/// Screen the strongly correlated pairs of a cleaned table.
///
/// Pairs where the stationarity test cannot run (for example, too few
/// rows) are skipped with a logged warning; this never fails the caller.
pub fn spurious_flags(
    table: &NumericTable,
    corr: &CorrelationMatrix,
    p: &CorrelationMatrix,
) -> Vec<SpuriousFlag> {
    flags_with_threshold(table, corr, p, SPURIOUS_CORRELATION_THRESHOLD)
}

/// Standalone spurious screen over the named metric columns.
///
/// Cleans the columns, builds the matrices with the given method, and
/// screens with a caller-chosen correlation threshold.
pub fn detect_spurious(
    df: &DataFrame,
    metrics: &[&str],
    method: CorrelationMethod,
    min_correlation: f64,
) -> Result<Vec<SpuriousFlag>> {
    if !(0.0..=1.0).contains(&min_correlation) {
        return Err(CorrelationError::InvalidParameter(format!(
            "min_correlation must be between 0 and 1, got {}",
            min_correlation
        )));
    }
    let table = NumericTable::from_dataframe(df, metrics)?;
    let (corr, p) = build_matrices(&table, method);
    Ok(flags_with_threshold(&table, &corr, &p, min_correlation))
}

fn flags_with_threshold(
    table: &NumericTable,
    corr: &CorrelationMatrix,
    p: &CorrelationMatrix,
    threshold: f64,
) -> Vec<SpuriousFlag> {
    let c = corr.len();
    let mut flags = Vec::new();

    for i in 0..c {
        for j in i + 1..c {
            let r = corr.values[i][j];
            let p_value = p.values[i][j];
            if r.abs() < threshold || p_value >= SPURIOUS_MAX_P_VALUE {
                continue;
            }

            let adf1 = adf_test(table.column(i));
            let adf2 = adf_test(table.column(j));
            match (adf1, adf2) {
                (Ok(first), Ok(second)) => {
                    if !first.is_stationary && !second.is_stationary {
                        flags.push(SpuriousFlag {
                            variable1: corr.variables[i].clone(),
                            variable2: corr.variables[j].clone(),
                            correlation: r,
                            reason: SPURIOUS_REASON.to_string(),
                            adf_pvalue1: first.p_value,
                            adf_pvalue2: second.p_value,
                            warning: SPURIOUS_WARNING.to_string(),
                        });
                    }
                }
                (Err(e), _) | (_, Err(e)) => {
                    log::warn!(
                        "Skipping spurious check for '{}' and '{}': {}",
                        corr.variables[i],
                        corr.variables[j],
                        e
                    );
                }
            }
        }
    }
    flags
}
