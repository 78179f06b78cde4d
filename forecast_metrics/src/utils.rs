//! Synthetic metric data for demos and tests
//!
//! Seeded generators so the same seed always yields the same frame.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// First timestamp used by all generators
pub fn base_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Daily timestamps starting at [`base_timestamp`]
pub fn daily_timestamps(days: usize) -> Vec<DateTime<Utc>> {
    let base = base_timestamp();
    (0..days).map(|i| base + Duration::days(i as i64)).collect()
}

/// Hourly timestamps starting at [`base_timestamp`]
pub fn hourly_timestamps(hours: usize) -> Vec<DateTime<Utc>> {
    let base = base_timestamp();
    (0..hours)
        .map(|i| base + Duration::hours(i as i64))
        .collect()
}

/// Build a two-column (timestamp, value) frame.
///
/// Timestamps land as epoch milliseconds, which the preparer reads back
/// as UTC datetimes.
pub fn metric_frame(timestamps: &[DateTime<Utc>], values: &[f64]) -> Result<DataFrame> {
    let ms: Vec<i64> = timestamps.iter().map(|t| t.timestamp_millis()).collect();
    let df = df! {
        "timestamp" => ms,
        "value" => values.to_vec(),
    }?;
    Ok(df)
}

/// Daily linear series with Gaussian noise
pub fn generate_linear_frame(
    days: usize,
    start: f64,
    slope_per_day: f64,
    noise_std: f64,
    seed: u64,
) -> Result<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, noise_std)
        .map_err(|e| ForecastError::InvalidParameter(format!("Invalid noise level: {}", e)))?;
    let values: Vec<f64> = (0..days)
        .map(|i| start + slope_per_day * i as f64 + noise.sample(&mut rng))
        .collect();
    metric_frame(&daily_timestamps(days), &values)
}

/// Daily series with a repeating sinusoidal pattern, a trend, and noise
pub fn generate_seasonal_frame(
    days: usize,
    base: f64,
    amplitude: f64,
    period: usize,
    slope_per_day: f64,
    noise_std: f64,
    seed: u64,
) -> Result<DataFrame> {
    if period == 0 {
        return Err(ForecastError::InvalidParameter(
            "period must be at least 1".to_string(),
        ));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, noise_std)
        .map_err(|e| ForecastError::InvalidParameter(format!("Invalid noise level: {}", e)))?;
    let values: Vec<f64> = (0..days)
        .map(|i| {
            let cycle = (i as f64 / period as f64) * std::f64::consts::TAU;
            base + slope_per_day * i as f64 + amplitude * cycle.sin() + noise.sample(&mut rng)
        })
        .collect();
    metric_frame(&daily_timestamps(days), &values)
}

/// Daily random-walk series with a drift factor, the shock at each step
/// proportional to the current level
pub fn generate_metric_walk(
    days: usize,
    start: f64,
    volatility: f64,
    trend: f64,
    seed: u64,
) -> Result<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut current = start;
    let mut values = Vec::with_capacity(days);
    for _ in 0..days {
        let shock = current * volatility * (rng.gen::<f64>() - 0.5);
        current = current * (1.0 + trend) + shock;
        values.push(current);
    }
    metric_frame(&daily_timestamps(days), &values)
}
