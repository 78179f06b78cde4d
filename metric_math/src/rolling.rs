//! Rolling-window statistics with DataFrame-style edge semantics
//!
//! Trailing windows honor a `min_periods` floor and emit NaN before it is
//! reached; centered windows emit NaN wherever the full window does not
//! fit. `NaN` is used as the in-band missing marker so results can be
//! filled with [`fill_forward`] / [`fill_backward`] afterwards.

use crate::descriptive;

/// Trailing rolling mean over `window` observations.
///
/// Position i averages `values[i + 1 - window ..= i]` (clamped at the
/// start); positions with fewer than `min_periods` observations are NaN.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    let min_periods = min_periods.max(1);
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        if slice.len() < min_periods {
            out.push(f64::NAN);
        } else {
            out.push(descriptive::mean(slice).unwrap_or(f64::NAN));
        }
    }
    out
}

/// Trailing rolling sample standard deviation over `window` observations.
///
/// A window holding a single observation is NaN regardless of
/// `min_periods`, matching the n - 1 denominator.
pub fn rolling_std(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    let min_periods = min_periods.max(1);
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        if slice.len() < min_periods || slice.len() < 2 {
            out.push(f64::NAN);
        } else {
            out.push(descriptive::sample_std(slice).unwrap_or(f64::NAN));
        }
    }
    out
}

/// Centered rolling mean; NaN where the full window does not fit.
///
/// The window at position i spans `[i - (window - 1) / 2, i + window / 2]`,
/// so even windows lean one observation to the right.
pub fn centered_rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let before = (window.max(1) - 1) / 2;
    let after = window / 2;
    let n = values.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        if i < before || i + after >= n {
            out.push(f64::NAN);
        } else {
            out.push(descriptive::mean(&values[i - before..=i + after]).unwrap_or(f64::NAN));
        }
    }
    out
}

/// Centered rolling sample standard deviation; NaN on incomplete windows
/// and for window 1.
pub fn centered_rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let before = (window.max(1) - 1) / 2;
    let after = window / 2;
    let n = values.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        if i < before || i + after >= n || window < 2 {
            out.push(f64::NAN);
        } else {
            out.push(descriptive::sample_std(&values[i - before..=i + after]).unwrap_or(f64::NAN));
        }
    }
    out
}

/// Centered moving average whose windows shrink at the edges instead of
/// going NaN. Used for trend extraction in seasonal decomposition.
pub fn centered_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let before = (window.max(1) - 1) / 2;
    let after = window / 2;
    let n = values.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let start = i.saturating_sub(before);
        let end = (i + after).min(n.saturating_sub(1));
        out.push(descriptive::mean(&values[start..=end]).unwrap_or(f64::NAN));
    }
    out
}

/// Replace each NaN with the nearest following non-NaN value
pub fn fill_backward(values: &mut [f64]) {
    let mut next_valid = f64::NAN;
    for v in values.iter_mut().rev() {
        if v.is_nan() {
            *v = next_valid;
        } else {
            next_valid = *v;
        }
    }
}

/// Replace each NaN with the nearest preceding non-NaN value
pub fn fill_forward(values: &mut [f64]) {
    let mut prev_valid = f64::NAN;
    for v in values.iter_mut() {
        if v.is_nan() {
            *v = prev_valid;
        } else {
            prev_valid = *v;
        }
    }
}
