//! Time series extraction and preparation for metric data
//!
//! Raw tables arrive as polars DataFrames with a designated time column
//! and metric column. Preparation drops incomplete rows, coerces the time
//! column to UTC datetimes, sorts chronologically, deduplicates timestamps
//! keeping the last occurrence, and infers the sampling frequency from the
//! median gap between consecutive points.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::path::Path;

/// Minimum number of cleaned points required for any time series analysis
pub const MIN_DATA_POINTS: usize = 3;

/// A single cleaned observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    /// Observation timestamp (UTC)
    pub timestamp: DateTime<Utc>,
    /// Observed metric value
    pub value: f64,
}

/// Sampling frequency inferred from timestamp spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFrequency {
    /// Roughly one observation per hour
    Hourly,
    /// Roughly one observation per day
    Daily,
    /// Roughly one observation per week
    Weekly,
    /// Roughly one observation per month
    Monthly,
    /// Roughly one observation per year
    Yearly,
}

impl SampleFrequency {
    /// Step between generated future timestamps
    pub fn step(&self) -> chrono::Duration {
        match self {
            SampleFrequency::Hourly => chrono::Duration::hours(1),
            SampleFrequency::Daily => chrono::Duration::days(1),
            SampleFrequency::Weekly => chrono::Duration::days(7),
            SampleFrequency::Monthly => chrono::Duration::days(30),
            SampleFrequency::Yearly => chrono::Duration::days(365),
        }
    }

    /// Step length in fractional days, used as the regression increment
    pub fn step_days(&self) -> f64 {
        self.step().num_seconds() as f64 / 86_400.0
    }

    /// Number of observations per seasonal cycle, where one exists
    pub fn seasonal_period(&self) -> Option<usize> {
        match self {
            SampleFrequency::Hourly => Some(24),
            SampleFrequency::Daily => Some(7),
            SampleFrequency::Weekly => Some(52),
            SampleFrequency::Monthly => Some(12),
            SampleFrequency::Yearly => None,
        }
    }

    /// Lowercase label used in report metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleFrequency::Hourly => "hourly",
            SampleFrequency::Daily => "daily",
            SampleFrequency::Weekly => "weekly",
            SampleFrequency::Monthly => "monthly",
            SampleFrequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for SampleFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cleaned, sorted, deduplicated series ready for analysis
#[derive(Debug, Clone)]
pub struct PreparedSeries {
    points: Vec<TimeSeriesPoint>,
    frequency: SampleFrequency,
}

impl PreparedSeries {
    /// The cleaned observations, oldest first
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Inferred sampling frequency
    pub fn frequency(&self) -> SampleFrequency {
        self.frequency
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no observations
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Metric values in chronological order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Timestamps in chronological order
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Fractional days elapsed since the first observation
    pub fn elapsed_days(&self) -> Vec<f64> {
        match self.points.first() {
            Some(first) => self
                .points
                .iter()
                .map(|p| (p.timestamp - first.timestamp).num_milliseconds() as f64 / 86_400_000.0)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Future timestamps continuing the series at the inferred step
    pub fn future_timestamps(&self, periods: usize) -> Vec<DateTime<Utc>> {
        let last = match self.points.last() {
            Some(p) => p.timestamp,
            None => return Vec::new(),
        };
        let step = self.frequency.step();
        (1..=periods as i32).map(|k| last + step * k).collect()
    }
}

/// Data loader for metric tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a metric table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let file = File::open(path)?;
        // Use polars DataFrame reader directly
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Ok(df)
    }
}

/// Turns raw (time, metric) column pairs into a [`PreparedSeries`]
#[derive(Debug)]
pub struct DataPreparer;

impl DataPreparer {
    /// Clean and align a time/metric column pair.
    ///
    /// Rows with a null (or unparseable) entry in either column are
    /// dropped; duplicate timestamps keep the last occurrence in row
    /// order. Fails when fewer than [`MIN_DATA_POINTS`] rows survive.
    pub fn prepare(df: &DataFrame, time_column: &str, metric_column: &str) -> Result<PreparedSeries> {
        let timestamps = extract_timestamps(df, time_column)?;
        let values = extract_numeric(df, metric_column)?;

        let mut points: Vec<TimeSeriesPoint> = timestamps
            .into_iter()
            .zip(values)
            .filter_map(|(ts, value)| match (ts, value) {
                (Some(timestamp), Some(value)) => Some(TimeSeriesPoint { timestamp, value }),
                _ => None,
            })
            .collect();

        // Stable sort keeps row order within equal timestamps, so
        // overwriting each duplicate leaves the last occurrence
        points.sort_by_key(|p| p.timestamp);
        let mut deduped: Vec<TimeSeriesPoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.timestamp == point.timestamp => *last = point,
                _ => deduped.push(point),
            }
        }

        if deduped.len() < MIN_DATA_POINTS {
            return Err(ForecastError::InsufficientData(format!(
                "Need at least {} data points for analysis, got {}",
                MIN_DATA_POINTS,
                deduped.len()
            )));
        }

        let frequency = infer_frequency(&deduped);
        Ok(PreparedSeries {
            points: deduped,
            frequency,
        })
    }
}

/// Extract a time column as UTC datetimes, preserving nulls.
///
/// Accepts Datetime (any time unit), Date, string columns in RFC 3339 or
/// `%Y-%m-%d [%H:%M:%S]` form, and Int64 epoch milliseconds. Unparseable
/// strings count as null.
pub fn extract_timestamps(df: &DataFrame, name: &str) -> Result<Vec<Option<DateTime<Utc>>>> {
    let col = df
        .column(name)
        .map_err(|_| ForecastError::InvalidColumn(format!("Time column '{}' not found", name)))?;

    match col.dtype() {
        DataType::Datetime(time_unit, _) => {
            let unit = *time_unit;
            Ok(col
                .datetime()
                .map_err(|e| ForecastError::PolarsError(e.to_string()))?
                .into_iter()
                .map(|opt_ts| opt_ts.and_then(|ts| datetime_from_units(ts, unit)))
                .collect())
        }
        DataType::Date => Ok(col
            .date()
            .map_err(|e| ForecastError::PolarsError(e.to_string()))?
            .into_iter()
            .map(|opt_days| {
                opt_days.and_then(|days| DateTime::from_timestamp(i64::from(days) * 86_400, 0))
            })
            .collect()),
        DataType::Utf8 => Ok(col
            .utf8()
            .map_err(|e| ForecastError::PolarsError(e.to_string()))?
            .into_iter()
            .map(|opt_s| opt_s.and_then(parse_datetime_str))
            .collect()),
        DataType::Int64 => Ok(col
            .i64()
            .map_err(|e| ForecastError::PolarsError(e.to_string()))?
            .into_iter()
            .map(|opt_ms| opt_ms.and_then(DateTime::from_timestamp_millis))
            .collect()),
        other => Err(ForecastError::InvalidColumn(format!(
            "Time column '{}' has unsupported dtype {:?}",
            name, other
        ))),
    }
}

/// Extract a numeric column as f64, preserving nulls. NaN values count
/// as null so they are dropped alongside them.
pub fn extract_numeric(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = df
        .column(name)
        .map_err(|_| ForecastError::InvalidColumn(format!("Metric column '{}' not found", name)))?;

    match col.dtype() {
        DataType::Float64 => Ok(col
            .f64()
            .map_err(|e| ForecastError::PolarsError(e.to_string()))?
            .into_iter()
            .map(|opt| opt.filter(|v| !v.is_nan()))
            .collect()),
        DataType::Float32 => Ok(col
            .f32()
            .map_err(|e| ForecastError::PolarsError(e.to_string()))?
            .into_iter()
            .map(|opt| opt.map(f64::from).filter(|v| !v.is_nan()))
            .collect()),
        DataType::Int64 => Ok(col
            .i64()
            .map_err(|e| ForecastError::PolarsError(e.to_string()))?
            .into_iter()
            .map(|opt| opt.map(|v| v as f64))
            .collect()),
        DataType::Int32 => Ok(col
            .i32()
            .map_err(|e| ForecastError::PolarsError(e.to_string()))?
            .into_iter()
            .map(|opt| opt.map(f64::from))
            .collect()),
        DataType::UInt64 => Ok(col
            .u64()
            .map_err(|e| ForecastError::PolarsError(e.to_string()))?
            .into_iter()
            .map(|opt| opt.map(|v| v as f64))
            .collect()),
        DataType::UInt32 => Ok(col
            .u32()
            .map_err(|e| ForecastError::PolarsError(e.to_string()))?
            .into_iter()
            .map(|opt| opt.map(f64::from))
            .collect()),
        other => Err(ForecastError::InvalidColumn(format!(
            "Column '{}' is not numeric (dtype {:?})",
            name, other
        ))),
    }
}

fn datetime_from_units(ts: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Nanoseconds => DateTime::from_timestamp(
            ts.div_euclid(1_000_000_000),
            ts.rem_euclid(1_000_000_000) as u32,
        ),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(ts),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(ts),
    }
}

fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }
    None
}

/// Bucket the median gap between consecutive points into a frequency.
///
/// The daily boundary is inclusive so that exactly-24h spacing reads as
/// daily rather than sliding into the weekly bucket.
fn infer_frequency(points: &[TimeSeriesPoint]) -> SampleFrequency {
    if points.len() < 2 {
        return SampleFrequency::Daily;
    }

    let mut gaps: Vec<i64> = points
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp).num_milliseconds())
        .collect();
    gaps.sort_unstable();
    let mid = gaps.len() / 2;
    let median_ms = if gaps.len() % 2 == 0 {
        (gaps[mid - 1] + gaps[mid]) as f64 / 2.0
    } else {
        gaps[mid] as f64
    };

    const HOUR_MS: f64 = 3_600_000.0;
    const DAY_MS: f64 = 86_400_000.0;
    if median_ms < 2.0 * HOUR_MS {
        SampleFrequency::Hourly
    } else if median_ms <= DAY_MS {
        SampleFrequency::Daily
    } else if median_ms < 8.0 * DAY_MS {
        SampleFrequency::Weekly
    } else if median_ms < 40.0 * DAY_MS {
        SampleFrequency::Monthly
    } else {
        SampleFrequency::Yearly
    }
}
