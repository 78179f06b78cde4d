//! Correlation analysis orchestration
//!
//! [`analyze_correlations`] cleans the requested columns, builds the
//! coefficient and p-value matrices, filters significant pairs, and
//! attaches clusters, partial correlations, VIF scores, and spurious
//! flags. The attached analyses degrade to empty collections on internal
//! failure; only validation and cleaning can fail the call.

use crate::clusters::{identify_clusters, Cluster};
use crate::dataset::NumericTable;
use crate::error::{CorrelationError, Result};
use crate::measures::{self, CorrelationMethod};
use crate::multicollinearity::{partial_correlations, vif_scores, PartialCorrelation};
use crate::spurious::{spurious_flags, SpuriousFlag};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// |r| at or above which a pair counts as strong
pub const STRONG_CORRELATION_THRESHOLD: f64 = 0.7;
/// |r| at or above which a pair counts as moderate
pub const MODERATE_CORRELATION_THRESHOLD: f64 = 0.4;
/// Default p-value cutoff for significance
pub const DEFAULT_MAX_P_VALUE: f64 = 0.05;

/// Analysis request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationConfig {
    /// Coefficient family to use
    pub method: CorrelationMethod,
    /// Smallest |r| a pair needs to be reported
    pub min_correlation: f64,
    /// Largest p-value a pair may have to be reported
    pub max_p_value: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        CorrelationConfig {
            method: CorrelationMethod::Pearson,
            min_correlation: 0.0,
            max_p_value: DEFAULT_MAX_P_VALUE,
        }
    }
}

impl CorrelationConfig {
    /// Check the parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_correlation) {
            return Err(CorrelationError::InvalidParameter(format!(
                "min_correlation must be between 0 and 1, got {}",
                self.min_correlation
            )));
        }
        if !(0.0..=1.0).contains(&self.max_p_value) {
            return Err(CorrelationError::InvalidParameter(format!(
                "max_p_value must be between 0 and 1, got {}",
                self.max_p_value
            )));
        }
        Ok(())
    }
}

/// Square symmetric matrix keyed by variable name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Variable names, one per row and column
    pub variables: Vec<String>,
    /// Row-major values
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Look up the entry for a pair of variables by name
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.variables.iter().position(|v| v == a)?;
        let j = self.variables.iter().position(|v| v == b)?;
        Some(self.values[i][j])
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the matrix is empty
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Strength grade of a correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    /// |r| at or above the strong threshold
    Strong,
    /// |r| at or above the moderate threshold
    Moderate,
    /// Everything below
    Weak,
}

impl CorrelationStrength {
    /// Grade a coefficient by magnitude
    pub fn from_coefficient(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude >= STRONG_CORRELATION_THRESHOLD {
            CorrelationStrength::Strong
        } else if magnitude >= MODERATE_CORRELATION_THRESHOLD {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Weak => "weak",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sign of a correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationDirection {
    /// Coefficient above zero
    Positive,
    /// Coefficient at or below zero
    Negative,
}

impl CorrelationDirection {
    /// Direction from the coefficient sign
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.0 {
            CorrelationDirection::Positive
        } else {
            CorrelationDirection::Negative
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationDirection::Positive => "positive",
            CorrelationDirection::Negative => "negative",
        }
    }
}

impl fmt::Display for CorrelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pair that passed the significance filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificantPair {
    /// First variable of the pair
    pub variable1: String,
    /// Second variable of the pair
    pub variable2: String,
    /// Coefficient
    pub correlation: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Strength grade
    pub strength: CorrelationStrength,
    /// Sign of the coefficient
    pub direction: CorrelationDirection,
}

/// Thresholds and columns echoed back with a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMetadata {
    /// Cleaned columns the analysis ran on
    pub columns: Vec<String>,
    /// Requested minimum |r|
    pub min_correlation_threshold: f64,
    /// Requested maximum p-value
    pub max_p_value_threshold: f64,
}

/// Complete correlation analysis report
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    /// Coefficient matrix
    pub correlation_matrix: CorrelationMatrix,
    /// p-value matrix
    pub p_value_matrix: CorrelationMatrix,
    /// Pairs passing the thresholds, strongest first
    pub significant_pairs: Vec<SignificantPair>,
    /// Groups of mutually correlated variables
    pub clusters: Vec<Cluster>,
    /// Pairwise correlations controlling for the other variables
    pub partial_correlations: Vec<PartialCorrelation>,
    /// Variance inflation factor per variable
    pub vif_scores: BTreeMap<String, f64>,
    /// Highly correlated pairs that may share only a trend
    pub spurious_correlations: Vec<SpuriousFlag>,
    /// Coefficient family used
    pub method: CorrelationMethod,
    /// Number of cleaned variables
    pub num_variables: usize,
    /// Number of observations per variable
    pub num_observations: usize,
    /// Request context
    pub metadata: CorrelationMetadata,
}

/// Analyze correlations between the named metric columns.
///
/// Cleans the columns (dropping all-null and constant ones), computes the
/// symmetric coefficient and p-value matrices, and attaches every derived
/// analysis. Matrix order follows the cleaned column order, so identical
/// inputs yield identical reports.
pub fn analyze_correlations(
    df: &DataFrame,
    metrics: &[&str],
    config: &CorrelationConfig,
) -> Result<CorrelationReport> {
    config.validate()?;
    let table = NumericTable::from_dataframe(df, metrics)?;

    let (correlation_matrix, p_value_matrix) = build_matrices(&table, config.method);
    let significant_pairs = find_significant_pairs(
        &correlation_matrix,
        &p_value_matrix,
        config.min_correlation,
        config.max_p_value,
    );
    let clusters = identify_clusters(&correlation_matrix);
    let partial = partial_correlations(&table);
    let vif = vif_scores(&table);
    let spurious = spurious_flags(&table, &correlation_matrix, &p_value_matrix);

    let columns = table.columns().to_vec();
    Ok(CorrelationReport {
        correlation_matrix,
        p_value_matrix,
        significant_pairs,
        clusters,
        partial_correlations: partial,
        vif_scores: vif,
        spurious_correlations: spurious,
        method: config.method,
        num_variables: table.n_columns(),
        num_observations: table.n_rows(),
        metadata: CorrelationMetadata {
            columns,
            min_correlation_threshold: config.min_correlation,
            max_p_value_threshold: config.max_p_value,
        },
    })
}

/// Build the symmetric coefficient and p-value matrices for a cleaned
/// table
pub fn build_matrices(
    table: &NumericTable,
    method: CorrelationMethod,
) -> (CorrelationMatrix, CorrelationMatrix) {
    let c = table.n_columns();
    let n = table.n_rows();
    let mut corr = vec![vec![0.0; c]; c];
    let mut p = vec![vec![1.0; c]; c];

    for i in 0..c {
        corr[i][i] = 1.0;
        p[i][i] = 0.0;
        for j in i + 1..c {
            let r = match measures::correlation(method, table.column(i), table.column(j)) {
                Some(r) => r,
                None => {
                    log::warn!(
                        "Correlation of '{}' and '{}' is undefined, recording 0",
                        table.columns()[i],
                        table.columns()[j]
                    );
                    0.0
                }
            };
            let p_value = measures::p_value(method, r, n);
            corr[i][j] = r;
            corr[j][i] = r;
            p[i][j] = p_value;
            p[j][i] = p_value;
        }
    }

    let variables = table.columns().to_vec();
    (
        CorrelationMatrix {
            variables: variables.clone(),
            values: corr,
        },
        CorrelationMatrix {
            variables,
            values: p,
        },
    )
}

fn find_significant_pairs(
    corr: &CorrelationMatrix,
    p: &CorrelationMatrix,
    min_correlation: f64,
    max_p_value: f64,
) -> Vec<SignificantPair> {
    let mut pairs = Vec::new();
    let c = corr.len();
    for i in 0..c {
        for j in i + 1..c {
            let r = corr.values[i][j];
            let p_value = p.values[i][j];
            if r.abs() >= min_correlation && p_value <= max_p_value {
                pairs.push(SignificantPair {
                    variable1: corr.variables[i].clone(),
                    variable2: corr.variables[j].clone(),
                    correlation: r,
                    p_value,
                    strength: CorrelationStrength::from_coefficient(r),
                    direction: CorrelationDirection::from_coefficient(r),
                });
            }
        }
    }
    // Stable sort keeps pair order within equal magnitudes
    pairs.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pairs
}
