//! Aggregation over sleep record windows
//!
//! Means and bedtime spread for trend advice, plus the overall summary shown
//! alongside the record list.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::CalculationError;
use crate::models::SleepRecord;

/// Aggregates over a window of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Number of records aggregated
    pub count: usize,

    /// Mean quality rating
    pub mean_quality: f64,

    /// Mean stored sleep duration in hours
    pub mean_duration_hours: f64,

    /// Sample variance (n - 1) of the wall-clock bedtime hour.
    /// `None` when fewer than two records make it undefined.
    pub bedtime_hour_variance: Option<f64>,
}

/// Overall figures for a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSummary {
    pub record_count: usize,
    pub avg_duration_hours: f64,
    pub avg_quality: f64,
    /// Record with the most recent date
    pub latest: SleepRecord,
}

/// Aggregate a non-empty window of records
pub fn window_stats(records: &[SleepRecord]) -> Result<WindowStats, CalculationError> {
    if records.is_empty() {
        return Err(CalculationError::EmptyWindow {
            calculation: "window statistics".to_string(),
        });
    }

    let qualities: Vec<f64> = records
        .iter()
        .map(|r| r.sleep_quality.value() as f64)
        .collect();
    let durations: Vec<f64> = records.iter().map(|r| r.sleep_duration_hours).collect();
    let bedtime_hours: Vec<f64> = records.iter().map(|r| r.bedtime_hour() as f64).collect();

    let variance = if bedtime_hours.len() < 2 {
        None
    } else {
        Some(bedtime_hours.iter().variance())
    };

    Ok(WindowStats {
        count: records.len(),
        mean_quality: qualities.iter().mean(),
        mean_duration_hours: durations.iter().mean(),
        bedtime_hour_variance: variance,
    })
}

/// The `n` most recent records by date, newest first
pub fn recent_window(records: &[SleepRecord], n: usize) -> Vec<SleepRecord> {
    let mut sorted = newest_first(records);
    sorted.truncate(n);
    sorted
}

/// All records ordered newest first
pub fn newest_first(records: &[SleepRecord]) -> Vec<SleepRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Overall summary, `None` when there is no data yet
pub fn summarize(records: &[SleepRecord]) -> Option<SleepSummary> {
    let latest = records.iter().max_by_key(|r| r.date)?.clone();
    let stats = window_stats(records).ok()?;

    Some(SleepSummary {
        record_count: stats.count,
        avg_duration_hours: stats.mean_duration_hours,
        avg_quality: stats.mean_quality,
        latest,
    })
}
