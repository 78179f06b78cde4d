use chrono::{TimeZone, Utc};
use forecast_metrics::data::{DataLoader, DataPreparer, SampleFrequency, MIN_DATA_POINTS};
use forecast_metrics::error::ForecastError;
use polars::prelude::*;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

const DAY_MS: i64 = 86_400_000;

fn frame(ts_ms: Vec<i64>, values: Vec<f64>) -> DataFrame {
    df! {
        "ts" => ts_ms,
        "value" => values,
    }
    .unwrap()
}

fn base_ms() -> i64 {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .unwrap()
        .timestamp_millis()
}

#[test]
fn test_prepare_sorts_out_of_order_rows() {
    let base = base_ms();
    let df = frame(
        vec![base + 2 * DAY_MS, base, base + DAY_MS],
        vec![3.0, 1.0, 2.0],
    );
    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();

    assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
    let timestamps = series.timestamps();
    assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_prepare_drops_null_rows() {
    let base = base_ms();
    let df = df! {
        "ts" => vec![base, base + DAY_MS, base + 2 * DAY_MS, base + 3 * DAY_MS],
        "value" => vec![Some(1.0), None, Some(3.0), Some(4.0)],
    }
    .unwrap();
    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.values(), vec![1.0, 3.0, 4.0]);
}

#[test]
fn test_prepare_drops_nan_values() {
    let base = base_ms();
    let df = frame(
        vec![base, base + DAY_MS, base + 2 * DAY_MS, base + 3 * DAY_MS],
        vec![1.0, f64::NAN, 3.0, 4.0],
    );
    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();
    assert_eq!(series.values(), vec![1.0, 3.0, 4.0]);
}

#[test]
fn test_prepare_dedupes_keeping_last() {
    let base = base_ms();
    // Two rows share a timestamp; the later row wins
    let df = frame(
        vec![base, base + DAY_MS, base + DAY_MS, base + 2 * DAY_MS],
        vec![1.0, 2.0, 99.0, 3.0],
    );
    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.values(), vec![1.0, 99.0, 3.0]);
}

#[test]
fn test_prepare_requires_minimum_points() {
    let base = base_ms();
    let df = frame(vec![base, base + DAY_MS], vec![1.0, 2.0]);
    let result = DataPreparer::prepare(&df, "ts", "value");
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
    assert_eq!(MIN_DATA_POINTS, 3);
}

#[test]
fn test_prepare_missing_columns() {
    let base = base_ms();
    let df = frame(vec![base, base + DAY_MS, base + 2 * DAY_MS], vec![1.0, 2.0, 3.0]);

    let result = DataPreparer::prepare(&df, "missing", "value");
    assert!(matches!(result, Err(ForecastError::InvalidColumn(_))));

    let result = DataPreparer::prepare(&df, "ts", "missing");
    assert!(matches!(result, Err(ForecastError::InvalidColumn(_))));
}

#[test]
fn test_prepare_rejects_non_numeric_metric() {
    let base = base_ms();
    let df = df! {
        "ts" => vec![base, base + DAY_MS, base + 2 * DAY_MS],
        "value" => vec!["a", "b", "c"],
    }
    .unwrap();
    let result = DataPreparer::prepare(&df, "ts", "value");
    assert!(matches!(result, Err(ForecastError::InvalidColumn(_))));
}

#[rstest]
#[case(3_600_000, SampleFrequency::Hourly)]
#[case(7_199_999, SampleFrequency::Hourly)]
#[case(7_200_000, SampleFrequency::Daily)]
#[case(DAY_MS, SampleFrequency::Daily)]
#[case(2 * DAY_MS, SampleFrequency::Weekly)]
#[case(7 * DAY_MS, SampleFrequency::Weekly)]
#[case(10 * DAY_MS, SampleFrequency::Monthly)]
#[case(30 * DAY_MS, SampleFrequency::Monthly)]
#[case(40 * DAY_MS, SampleFrequency::Yearly)]
#[case(365 * DAY_MS, SampleFrequency::Yearly)]
fn test_frequency_buckets(#[case] gap_ms: i64, #[case] expected: SampleFrequency) {
    let base = base_ms();
    let ts: Vec<i64> = (0..5).map(|i| base + i * gap_ms).collect();
    let df = frame(ts, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();
    assert_eq!(series.frequency(), expected);
}

#[test]
fn test_string_timestamps_parse() {
    let df = df! {
        "ts" => vec!["2024-01-01", "2024-01-02", "2024-01-03", "not a date"],
        "value" => vec![1.0, 2.0, 3.0, 4.0],
    }
    .unwrap();
    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();

    // The unparseable row drops out
    assert_eq!(series.len(), 3);
    assert_eq!(series.frequency(), SampleFrequency::Daily);
    assert_eq!(
        series.points()[0].timestamp,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_string_timestamps_with_time_component() {
    let df = df! {
        "ts" => vec![
            "2024-01-01 08:30:00",
            "2024-01-01 09:30:00",
            "2024-01-01 10:30:00",
        ],
        "value" => vec![1.0, 2.0, 3.0],
    }
    .unwrap();
    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();
    assert_eq!(series.frequency(), SampleFrequency::Hourly);
}

#[test]
fn test_datetime_column_milliseconds() {
    let base = base_ms();
    let ts = Series::new("ts", vec![base, base + DAY_MS, base + 2 * DAY_MS])
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .unwrap();
    let values = Series::new("value", vec![1.0, 2.0, 3.0]);
    let df = DataFrame::new(vec![ts, values]).unwrap();

    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.frequency(), SampleFrequency::Daily);
}

#[test]
fn test_date_column() {
    // Days since epoch: 2024-01-01 is day 19723
    let ts = Series::new("ts", vec![19723i32, 19724, 19725])
        .cast(&DataType::Date)
        .unwrap();
    let values = Series::new("value", vec![1.0, 2.0, 3.0]);
    let df = DataFrame::new(vec![ts, values]).unwrap();

    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();
    assert_eq!(
        series.points()[0].timestamp,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_integer_metric_column() {
    let base = base_ms();
    let df = df! {
        "ts" => vec![base, base + DAY_MS, base + 2 * DAY_MS],
        "value" => vec![10i64, 20, 30],
    }
    .unwrap();
    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();
    assert_eq!(series.values(), vec![10.0, 20.0, 30.0]);
}

#[test]
fn test_future_timestamps_continue_inferred_step() {
    let base = base_ms();
    let ts: Vec<i64> = (0..4).map(|i| base + i * DAY_MS).collect();
    let df = frame(ts, vec![1.0, 2.0, 3.0, 4.0]);
    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();

    let future = series.future_timestamps(3);
    let last = series.points().last().unwrap().timestamp;
    assert_eq!(future.len(), 3);
    assert_eq!(future[0], last + chrono::Duration::days(1));
    assert_eq!(future[2], last + chrono::Duration::days(3));
}

#[test]
fn test_elapsed_days_are_fractional() {
    let base = base_ms();
    let ts = vec![base, base + DAY_MS / 2, base + DAY_MS];
    let df = frame(ts, vec![1.0, 2.0, 3.0]);
    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();

    let days = series.elapsed_days();
    assert!((days[0] - 0.0).abs() < 1e-12);
    assert!((days[1] - 0.5).abs() < 1e-12);
    assert!((days[2] - 1.0).abs() < 1e-12);
}

#[test]
fn test_data_loader_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "ts,value").unwrap();
    writeln!(file, "2024-01-01,100.0").unwrap();
    writeln!(file, "2024-01-02,105.0").unwrap();
    writeln!(file, "2024-01-03,103.0").unwrap();

    let df = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(df.height(), 3);

    let series = DataPreparer::prepare(&df, "ts", "value").unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.frequency(), SampleFrequency::Daily);
}

#[test]
fn test_data_loader_missing_file() {
    let result = DataLoader::from_csv("no_such_file.csv");
    assert!(result.is_err());
}
