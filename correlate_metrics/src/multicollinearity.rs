//! Partial correlations and variance inflation factors
//!
//! Both analyses ask how much of a pairwise relationship survives once
//! the other variables are accounted for, via OLS residualization.

use crate::dataset::NumericTable;
use metric_math::correlation::pearson;
use metric_math::regression::OlsRegression;
use serde::Serialize;
use std::collections::BTreeMap;

/// Cap on the number of pairs residualized for partial correlations
pub const MAX_PARTIAL_PAIRS: usize = 10;

/// Correlation of a pair after controlling for the remaining variables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialCorrelation {
    /// First variable of the pair
    pub variable1: String,
    /// Second variable of the pair
    pub variable2: String,
    /// Pearson correlation of the two residual series
    pub partial_correlation: f64,
    /// Variables regressed out of both sides
    pub controlled_for: Vec<String>,
}

/// Partial correlations for the first [`MAX_PARTIAL_PAIRS`] column pairs.
///
/// Pairs without controls (a two-column table) produce nothing. A
/// singular fit records 0.0 for that pair with a logged warning.
pub fn partial_correlations(table: &NumericTable) -> Vec<PartialCorrelation> {
    let c = table.n_columns();
    let max_pairs = MAX_PARTIAL_PAIRS.min(c * (c - 1) / 2);

    let mut out = Vec::new();
    let mut pair_count = 0usize;
    'pairs: for i in 0..c {
        for j in i + 1..c {
            if pair_count >= max_pairs {
                break 'pairs;
            }
            let controls: Vec<usize> = (0..c).filter(|&k| k != i && k != j).collect();
            if !controls.is_empty() {
                let partial_correlation = residual_correlation(table, i, j, &controls);
                out.push(PartialCorrelation {
                    variable1: table.columns()[i].clone(),
                    variable2: table.columns()[j].clone(),
                    partial_correlation,
                    controlled_for: controls
                        .iter()
                        .map(|&k| table.columns()[k].clone())
                        .collect(),
                });
            }
            pair_count += 1;
        }
    }
    out
}

fn residual_correlation(table: &NumericTable, i: usize, j: usize, controls: &[usize]) -> f64 {
    let regressors: Vec<Vec<f64>> = controls.iter().map(|&k| table.column(k).to_vec()).collect();

    let residuals_i = match OlsRegression::fit(&regressors, table.column(i)) {
        Ok(fit) => fit.residuals,
        Err(e) => {
            log::warn!(
                "Partial correlation of '{}' and '{}' unavailable: {}",
                table.columns()[i],
                table.columns()[j],
                e
            );
            return 0.0;
        }
    };
    let residuals_j = match OlsRegression::fit(&regressors, table.column(j)) {
        Ok(fit) => fit.residuals,
        Err(e) => {
            log::warn!(
                "Partial correlation of '{}' and '{}' unavailable: {}",
                table.columns()[i],
                table.columns()[j],
                e
            );
            return 0.0;
        }
    };

    match pearson(&residuals_i, &residuals_j) {
        Some(r) => r,
        None => {
            log::warn!(
                "Partial correlation of '{}' and '{}' is undefined, recording 0",
                table.columns()[i],
                table.columns()[j]
            );
            0.0
        }
    }
}

/// Variance inflation factor per variable, from the R-squared of
/// regressing it on all the others.
///
/// R-squared is clamped to [0, 1], so every factor is at least 1; an
/// exact linear combination yields infinity. Any singular fit abandons
/// the whole map with a logged warning.
pub fn vif_scores(table: &NumericTable) -> BTreeMap<String, f64> {
    let c = table.n_columns();
    let mut scores = BTreeMap::new();

    for i in 0..c {
        let regressors: Vec<Vec<f64>> = (0..c)
            .filter(|&k| k != i)
            .map(|k| table.column(k).to_vec())
            .collect();
        match OlsRegression::fit(&regressors, table.column(i)) {
            Ok(fit) => {
                let r_squared = fit.r_squared.clamp(0.0, 1.0);
                let vif = if r_squared < 1.0 {
                    1.0 / (1.0 - r_squared)
                } else {
                    f64::INFINITY
                };
                scores.insert(table.columns()[i].clone(), vif);
            }
            Err(e) => {
                log::warn!(
                    "VIF for '{}' unavailable, skipping all scores: {}",
                    table.columns()[i],
                    e
                );
                return BTreeMap::new();
            }
        }
    }
    scores
}
