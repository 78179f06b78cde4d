//! Correlation primitives: Pearson coefficient, mid-rank transformation,
//! and shift autocorrelation.

/// Pearson correlation coefficient between two equal-length slices.
///
/// Returns `None` for mismatched lengths, fewer than 2 observations, or
/// zero variance on either side. The result is clamped to [-1, 1] to
/// absorb floating-point overshoot.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut x_var = 0.0;
    let mut y_var = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        cov += dx * dy;
        x_var += dx * dx;
        y_var += dy * dy;
    }

    let denom = (x_var * y_var).sqrt();
    if denom < 1e-12 {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

/// 1-based ranks with ties assigned their average (mid) rank
pub fn rank_mid(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        // Extend over the run of tied values
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }
    ranks
}

/// Autocorrelation at `lag`: the Pearson correlation of the series against
/// itself shifted by `lag` positions.
///
/// Returns `None` when fewer than 2 overlapping pairs remain or the
/// overlap is degenerate; lag 0 is 1 by definition.
pub fn autocorrelation(values: &[f64], lag: usize) -> Option<f64> {
    if lag == 0 {
        return if values.len() < 2 { None } else { Some(1.0) };
    }
    if lag + 2 > values.len() {
        return None;
    }
    let n = values.len();
    pearson(&values[..n - lag], &values[lag..])
}
