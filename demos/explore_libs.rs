// This program walks the MetricSight analytics libraries over synthetic data
use correlate_metrics::analyzer::{analyze_correlations, CorrelationConfig};
use correlate_metrics::lagged::lagged_correlation;
use correlate_metrics::significance::correlation_significance;
use forecast_metrics::anomaly::detect_anomalies;
use forecast_metrics::engine::{ForecastConfig, ForecastEngine};
use forecast_metrics::trend::trend_strength;
use forecast_metrics::utils::{
    daily_timestamps, generate_linear_frame, generate_seasonal_frame, metric_frame,
};
use metric_math::correlation::pearson;
use metric_math::rolling::rolling_mean;
use metric_math::stationarity::adf_test;
use polars::prelude::*;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Exploring MetricSight analytics libraries\n");

    // Forecasting a seasonal metric
    println!("=== Metric Forecasting ===");
    show_forecast_examples()?;

    // Rolling-band outlier flags
    println!("\n=== Anomaly Screening ===");
    show_anomaly_examples()?;

    // Grading a fitted trend line
    println!("\n=== Trend Strength ===");
    show_trend_examples()?;

    // Multi-metric correlation report
    println!("\n=== Correlation Analysis ===");
    show_correlation_examples()?;

    // Leading-indicator discovery
    println!("\n=== Lead/Lag Discovery ===");
    show_lagged_examples()?;

    // Shared numeric primitives
    println!("\n=== Math Primitives ===");
    show_math_examples()?;

    println!("\nDone exploring");
    Ok(())
}

fn show_forecast_examples() -> Result<(), Box<dyn Error>> {
    // Twelve weeks of daily sign-ups: weekly cycle over a mild ramp
    let df = generate_seasonal_frame(84, 220.0, 35.0, 7, 1.5, 6.0, 42)?;

    let engine = ForecastEngine::new();
    let config = ForecastConfig {
        periods: 14,
        ..Default::default()
    };
    let result = engine.forecast(&df, "timestamp", "value", &config)?;

    println!("Requested method: {}", result.metadata.requested_method);
    println!("Resolved method:  {}", result.method);
    println!("Forecast trend:   {}", result.trend);
    println!("{}", result.accuracy);
    println!("First 5 of {} forecast points:", result.forecast.len());
    for point in result.forecast.iter().take(5) {
        println!(
            "  {}  {:7.2}  [{:7.2}, {:7.2}]",
            point.date.format("%Y-%m-%d"),
            point.forecast,
            point.lower_bound,
            point.upper_bound
        );
    }
    println!(
        "Metadata as JSON:\n{}",
        serde_json::to_string_pretty(&result.metadata)?
    );
    Ok(())
}

fn show_anomaly_examples() -> Result<(), Box<dyn Error>> {
    // A steady metric with one injected spike and one injected dip
    let mut values: Vec<f64> = (0..40).map(|i| 500.0 + 0.8 * i as f64).collect();
    values[12] = 700.0;
    values[27] = 320.0;
    let df = metric_frame(&daily_timestamps(values.len()), &values)?;

    let anomalies = detect_anomalies(&df, "timestamp", "value", 2.0)?;
    println!("Flagged {} of {} points:", anomalies.len(), values.len());
    for record in &anomalies {
        println!(
            "  {}  value {:6.1}  expected {:6.1}  {:4}  ({:.1} sigma)",
            record.date.format("%Y-%m-%d"),
            record.value,
            record.expected_value,
            record.kind.as_str(),
            record.deviation_score
        );
    }
    Ok(())
}

fn show_trend_examples() -> Result<(), Box<dyn Error>> {
    // Two months of a declining latency metric
    let df = generate_linear_frame(60, 1200.0, -4.0, 18.0, 9)?;
    let summary = trend_strength(&df, "timestamp", "value")?;

    println!("Direction: {} ({})", summary.direction, summary.strength);
    println!(
        "Slope {:.2} per day over {:.0} days, R2 {:.3}",
        summary.slope, summary.time_period_days, summary.r_squared
    );
    println!(
        "From {:.1} to {:.1} ({:+.1}%)",
        summary.start_value, summary.end_value, summary.percentage_change
    );
    Ok(())
}

fn show_correlation_examples() -> Result<(), Box<dyn Error>> {
    let n = 48usize;
    // Sign-ups track visits closely; support tickets march to their own beat
    let visits: Vec<f64> = (0..n)
        .map(|i| 900.0 + 12.0 * i as f64 + 30.0 * ((i % 7) as f64))
        .collect();
    let signups: Vec<f64> = visits
        .iter()
        .enumerate()
        .map(|(i, v)| 40.0 + 0.08 * v + 6.0 * (i as f64 * 0.9).sin())
        .collect();
    let tickets: Vec<f64> = (0..n)
        .map(|i| 55.0 + 10.0 * (i as f64 * 1.7).sin())
        .collect();
    let df = df! {
        "visits" => visits,
        "signups" => signups,
        "tickets" => tickets,
    }?;

    let config = CorrelationConfig::default();
    let report = analyze_correlations(&df, &["visits", "signups", "tickets"], &config)?;

    println!(
        "Analyzed {} variables over {} observations ({})",
        report.num_variables, report.num_observations, report.method
    );
    println!("Significant pairs:");
    for pair in &report.significant_pairs {
        println!(
            "  {} vs {}: r = {:+.3}, p = {:.4} ({} {})",
            pair.variable1,
            pair.variable2,
            pair.correlation,
            pair.p_value,
            pair.strength,
            pair.direction
        );
    }
    println!("Clusters:");
    for cluster in &report.clusters {
        println!(
            "  #{}: {}  (avg |r| = {:.3})",
            cluster.cluster_id,
            cluster.variables.join(", "),
            cluster.avg_correlation
        );
    }
    println!("VIF scores:");
    for (name, vif) in &report.vif_scores {
        println!("  {}: {:.2}", name, vif);
    }
    for flag in &report.spurious_correlations {
        println!(
            "Caution: {} vs {} - {}",
            flag.variable1, flag.variable2, flag.warning
        );
    }
    Ok(())
}

fn show_lagged_examples() -> Result<(), Box<dyn Error>> {
    // Ad spend moves in waves; sign-ups follow three days later
    let n = 45usize;
    let spend: Vec<f64> = (0..n)
        .map(|i| 1000.0 + 140.0 * (i as f64 / 9.0).sin())
        .collect();
    let signups: Vec<f64> = (0..n)
        .map(|i| 30.0 + 0.05 * spend[i.saturating_sub(3)] + 1.5 * (i as f64 * 1.3).cos())
        .collect();
    let timestamps: Vec<i64> = daily_timestamps(n)
        .iter()
        .map(|t| t.timestamp_millis())
        .collect();
    let df = df! {
        "timestamp" => timestamps,
        "spend" => spend,
        "signups" => signups,
    }?;

    let report = lagged_correlation(&df, "timestamp", "spend", "signups", 7)?;
    println!("Tested lags -7..=7 over {} rows", n);
    println!(
        "Best lag {}: r = {:+.3}",
        report.best_lag.lag, report.best_lag.correlation
    );
    println!("{}", report.relationship);

    // Confidence interval for the best-lag coefficient over its overlap
    let overlap = n - report.best_lag.lag.unsigned_abs() as usize;
    let sig = correlation_significance(report.best_lag.correlation, overlap, 0.05)?;
    println!(
        "Significance: t = {:.2}, p = {:.4}, {:.0}% CI [{:.3}, {:.3}]",
        sig.t_statistic,
        sig.p_value,
        100.0 * sig.confidence_interval.level,
        sig.confidence_interval.lower,
        sig.confidence_interval.upper
    );
    Ok(())
}

fn show_math_examples() -> Result<(), Box<dyn Error>> {
    let revenue = [
        1020.0, 1043.0, 1071.0, 1050.0, 1102.0, 1135.0, 1119.0, 1160.0,
    ];
    let refunds = [18.0, 21.0, 24.0, 22.0, 27.0, 30.0, 28.0, 33.0];

    if let Some(r) = pearson(&revenue, &refunds) {
        println!("pearson(revenue, refunds) = {:.3}", r);
    }

    let smoothed = rolling_mean(&revenue, 3, 1);
    println!(
        "rolling_mean(revenue, 3): last = {:.1}",
        smoothed.last().copied().unwrap_or(0.0)
    );

    // A drifting level fails the stationarity test; its differences pass
    let level: Vec<f64> = (0..30)
        .map(|i| 100.0 + 3.0 * i as f64 + ((i * 7 % 11) as f64))
        .collect();
    let diffs: Vec<f64> = level.windows(2).map(|w| w[1] - w[0]).collect();
    let level_test = adf_test(&level)?;
    let diff_test = adf_test(&diffs)?;
    println!(
        "ADF level: statistic {:6.2}, p {:.3}, stationary = {}",
        level_test.statistic, level_test.p_value, level_test.is_stationary
    );
    println!(
        "ADF diffs: statistic {:6.2}, p {:.3}, stationary = {}",
        diff_test.statistic, diff_test.p_value, diff_test.is_stationary
    );
    Ok(())
}
