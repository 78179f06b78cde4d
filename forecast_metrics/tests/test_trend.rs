use chrono::{TimeZone, Utc};
use forecast_metrics::error::ForecastError;
use forecast_metrics::models::Trend;
use forecast_metrics::trend::{trend_strength, TrendStrength};
use polars::prelude::*;

const DAY_MS: i64 = 86_400_000;

fn base_ms() -> i64 {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn daily_frame(values: &[f64]) -> DataFrame {
    let ts: Vec<i64> = (0..values.len() as i64)
        .map(|i| base_ms() + i * DAY_MS)
        .collect();
    df! {
        "timestamp" => ts,
        "value" => values.to_vec(),
    }
    .unwrap()
}

#[test]
fn test_strong_increasing_trend() {
    let values: Vec<f64> = (0..10).map(|i| 100.0 + 10.0 * i as f64).collect();
    let summary = trend_strength(&daily_frame(&values), "timestamp", "value").unwrap();

    assert_eq!(summary.direction, Trend::Increasing);
    assert_eq!(summary.strength, TrendStrength::Strong);
    assert!((summary.slope - 10.0).abs() < 1e-9);
    assert!((summary.r_squared - 1.0).abs() < 1e-9);
    assert!((summary.percentage_change - 90.0).abs() < 1e-9);
    assert_eq!(summary.start_value, 100.0);
    assert_eq!(summary.end_value, 190.0);
    assert!((summary.time_period_days - 9.0).abs() < 1e-9);
}

#[test]
fn test_strong_decreasing_trend() {
    let values: Vec<f64> = (0..10).map(|i| 200.0 - 10.0 * i as f64).collect();
    let summary = trend_strength(&daily_frame(&values), "timestamp", "value").unwrap();

    assert_eq!(summary.direction, Trend::Decreasing);
    assert_eq!(summary.strength, TrendStrength::Strong);
    assert!((summary.slope + 10.0).abs() < 1e-9);
    assert!((summary.percentage_change + 45.0).abs() < 1e-9);
}

#[test]
fn test_flat_series_is_stable() {
    let summary = trend_strength(&daily_frame(&[100.0; 10]), "timestamp", "value").unwrap();

    assert_eq!(summary.direction, Trend::Stable);
    assert_eq!(summary.strength, TrendStrength::Weak);
    assert_eq!(summary.slope, 0.0);
    assert_eq!(summary.percentage_change, 0.0);
}

#[test]
fn test_noisy_series_is_weak() {
    let values = [
        100.0, 130.0, 70.0, 120.0, 90.0, 110.0, 80.0, 140.0, 60.0, 100.0,
    ];
    let summary = trend_strength(&daily_frame(&values), "timestamp", "value").unwrap();

    assert_eq!(summary.strength, TrendStrength::Weak);
    assert!(summary.r_squared < 0.4);
}

#[test]
fn test_ramp_with_noise_is_moderate() {
    // Slope 10 per day with alternating offsets of 25 either way
    let values: Vec<f64> = (0..10)
        .map(|i| {
            let offset = if i % 2 == 0 { 25.0 } else { -25.0 };
            100.0 + 10.0 * i as f64 + offset
        })
        .collect();
    let summary = trend_strength(&daily_frame(&values), "timestamp", "value").unwrap();

    assert_eq!(summary.strength, TrendStrength::Moderate);
    assert_eq!(summary.direction, Trend::Increasing);
    assert!(summary.r_squared > 0.4 && summary.r_squared <= 0.7);
}

#[test]
fn test_percentage_change_uses_absolute_start() {
    let values: Vec<f64> = (0..10).map(|i| -100.0 + 10.0 * i as f64).collect();
    let summary = trend_strength(&daily_frame(&values), "timestamp", "value").unwrap();

    // From -100 to -10 against a magnitude of 100
    assert!((summary.percentage_change - 90.0).abs() < 1e-9);
    assert_eq!(summary.direction, Trend::Increasing);
}

#[test]
fn test_zero_start_gives_zero_percentage_change() {
    let values: Vec<f64> = (0..10).map(|i| 10.0 * i as f64).collect();
    let summary = trend_strength(&daily_frame(&values), "timestamp", "value").unwrap();

    assert_eq!(summary.percentage_change, 0.0);
    assert_eq!(summary.direction, Trend::Increasing);
}

#[test]
fn test_rows_are_sorted_before_fitting() {
    // Timestamps arrive newest first; chronological order still rises
    let ts: Vec<i64> = (0..10).rev().map(|i| base_ms() + i * DAY_MS).collect();
    let values: Vec<f64> = (0..10).rev().map(|i| 100.0 + 10.0 * i as f64).collect();
    let df = df! {
        "timestamp" => ts,
        "value" => values,
    }
    .unwrap();
    let summary = trend_strength(&df, "timestamp", "value").unwrap();

    assert_eq!(summary.direction, Trend::Increasing);
    assert_eq!(summary.start_value, 100.0);
    assert_eq!(summary.end_value, 190.0);
}

#[test]
fn test_missing_metric_column() {
    let df = daily_frame(&[100.0; 10]);
    let result = trend_strength(&df, "timestamp", "revenue");
    assert!(matches!(result, Err(ForecastError::InvalidColumn(_))));
}
