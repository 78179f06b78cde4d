//! Least-squares regression
//!
//! [`SimpleRegression`] fits one regressor and keeps the terms needed for
//! prediction intervals; [`OlsRegression`] fits several regressors through
//! the normal equations and keeps fitted values and residuals for
//! residualization.

use crate::{MathError, Result};

/// Ordinary least squares over a single regressor
#[derive(Debug, Clone)]
pub struct SimpleRegression {
    /// Fitted slope
    pub slope: f64,
    /// Fitted intercept
    pub intercept: f64,
    /// Coefficient of determination (0 when the response has no variance)
    pub r_squared: f64,
    /// Mean of the regressor
    pub x_mean: f64,
    /// Centered sum of squares of the regressor
    pub x_sum_sq: f64,
    /// Number of observations
    pub n: usize,
}

impl SimpleRegression {
    /// Fit y = slope * x + intercept by least squares
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MathError::InvalidInput(
                "x and y must have the same length".to_string(),
            ));
        }
        if x.len() < 2 {
            return Err(MathError::InsufficientData(
                "Need at least 2 points for regression".to_string(),
            ));
        }

        let n = x.len() as f64;
        let x_mean = x.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut x_sum_sq = 0.0;
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            numerator += (xi - x_mean) * (yi - y_mean);
            x_sum_sq += (xi - x_mean) * (xi - x_mean);
        }

        if x_sum_sq.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / x_sum_sq;
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            let predicted = slope * xi + intercept;
            ss_total += (yi - y_mean).powi(2);
            ss_residual += (yi - predicted).powi(2);
        }
        let r_squared = if ss_total.abs() < 1e-10 {
            0.0
        } else {
            1.0 - ss_residual / ss_total
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
            x_mean,
            x_sum_sq,
            n: x.len(),
        })
    }

    /// Predict the response at a regressor value
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Predicted responses for a slice of regressor values
    pub fn fitted(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }
}

/// Ordinary least squares over several regressors (with intercept)
#[derive(Debug, Clone)]
pub struct OlsRegression {
    /// Fitted coefficients, one per regressor
    pub coefficients: Vec<f64>,
    /// Fitted intercept
    pub intercept: f64,
    /// Coefficient of determination (0 when the response has no variance)
    pub r_squared: f64,
    /// In-sample predictions
    pub fitted: Vec<f64>,
    /// Response minus fitted
    pub residuals: Vec<f64>,
}

impl OlsRegression {
    /// Fit y on the given regressor columns via the normal equations
    pub fn fit(regressors: &[Vec<f64>], y: &[f64]) -> Result<Self> {
        if regressors.is_empty() {
            return Err(MathError::InvalidInput(
                "At least one regressor is required".to_string(),
            ));
        }
        let rows = y.len();
        if regressors.iter().any(|col| col.len() != rows) {
            return Err(MathError::InvalidInput(
                "All regressors must match the response length".to_string(),
            ));
        }
        let params = regressors.len() + 1;
        if rows < params {
            return Err(MathError::InsufficientData(format!(
                "Need at least {} observations to fit {} parameters",
                params,
                params
            )));
        }

        // Normal equations: (X'X) beta = X'y, X prefixed with a ones column
        let design_row = |t: usize| -> Vec<f64> {
            let mut row = Vec::with_capacity(params);
            row.push(1.0);
            for col in regressors {
                row.push(col[t]);
            }
            row
        };

        let mut xtx = vec![vec![0.0; params]; params];
        let mut xty = vec![0.0; params];
        for t in 0..rows {
            let row = design_row(t);
            for i in 0..params {
                xty[i] += row[i] * y[t];
                for j in 0..params {
                    xtx[i][j] += row[i] * row[j];
                }
            }
        }

        let beta = solve_linear_system(xtx, xty)?;
        let intercept = beta[0];
        let coefficients = beta[1..].to_vec();

        let mut fitted = Vec::with_capacity(rows);
        for t in 0..rows {
            let mut value = intercept;
            for (c, col) in coefficients.iter().zip(regressors.iter()) {
                value += c * col[t];
            }
            fitted.push(value);
        }
        let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(a, f)| a - f).collect();

        let y_mean = y.iter().sum::<f64>() / rows as f64;
        let ss_total: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
        let ss_residual: f64 = residuals.iter().map(|r| r * r).sum();
        let r_squared = if ss_total.abs() < 1e-10 {
            0.0
        } else {
            1.0 - ss_residual / ss_total
        };

        Ok(Self {
            coefficients,
            intercept,
            r_squared,
            fitted,
            residuals,
        })
    }
}

/// Solve a square linear system by Gaussian elimination with partial
/// pivoting. A vanishing pivot means the system is singular.
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let mut pivot_row = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if a[pivot_row][col].abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Singular design matrix: regressors are linearly dependent".to_string(),
            ));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        let pivot = a[col].clone();
        for row in col + 1..n {
            let factor = a[row][col] / pivot[col];
            for k in col..n {
                a[row][k] -= factor * pivot[k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in row + 1..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}
