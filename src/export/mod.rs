//! Export of sleep records to CSV and JSON
//!
//! Exports are written newest first in the interchange encoding, optionally
//! restricted to a date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::models::SleepRecord;
use crate::stats::newest_first;

pub mod csv;
pub mod json;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Date range filter for exports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateRange { start, end }
    }

    /// Check if a date falls within this range (both ends inclusive)
    pub fn contains(&self, date: &NaiveDate) -> bool {
        let after_start = self.start.map_or(true, |start| date >= &start);
        let before_end = self.end.map_or(true, |end| date <= &end);
        after_start && before_end
    }

    /// Records inside the range, newest first
    pub fn select(&self, records: &[SleepRecord]) -> Vec<SleepRecord> {
        newest_first(records)
            .into_iter()
            .filter(|r| self.contains(&r.date))
            .collect()
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Write `records` within `range` to `output_path` in `format`
///
/// Returns the number of records written.
pub fn export_records<P: AsRef<Path>>(
    records: &[SleepRecord],
    range: &DateRange,
    format: ExportFormat,
    output_path: P,
) -> Result<usize, ExportError> {
    let selected = range.select(records);

    match format {
        ExportFormat::Csv => csv::export_records(&selected, &output_path)?,
        ExportFormat::Json => json::export_records(&selected, &output_path)?,
    }

    tracing::info!(
        path = %output_path.as_ref().display(),
        format = ?format,
        count = selected.len(),
        "Exported sleep records"
    );
    Ok(selected.len())
}
