use chrono::{NaiveDate, NaiveTime, Timelike};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::duration::compute_duration;
use crate::error::ValidationError;

/// Interchange format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Interchange format for clock times (24-hour, zero padded)
pub const CLOCK_FORMAT: &str = "%H:%M";

/// Decimal places kept for the stored sleep duration
const DURATION_DECIMAL_PLACES: u32 = 2;

/// Subjective sleep quality rating, 1 (very poor) to 5 (very good)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct SleepQuality(u8);

impl SleepQuality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate a raw rating
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(SleepQuality(value as u8))
        } else {
            Err(ValidationError::QualityOutOfRange { value })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Star rating for display, one star per point
    pub fn stars(self) -> String {
        "⭐".repeat(self.0 as usize)
    }
}

impl TryFrom<i64> for SleepQuality {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        SleepQuality::new(value)
    }
}

impl From<SleepQuality> for u8 {
    fn from(quality: SleepQuality) -> Self {
        quality.0
    }
}

impl fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// One night's sleep observation, keyed by calendar date
///
/// The serialized field names match the JSON data files written by earlier
/// versions of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    /// Calendar date of the night (unique within a collection)
    pub date: NaiveDate,

    /// Local clock time the subject went to sleep
    #[serde(with = "clock_serde")]
    pub bedtime: NaiveTime,

    /// Local clock time the subject woke up
    #[serde(with = "clock_serde")]
    pub waketime: NaiveTime,

    /// Hours slept, derived at creation and rounded to two decimals
    #[serde(rename = "sleep_duration", deserialize_with = "hours_serde::deserialize")]
    pub sleep_duration_hours: f64,

    /// Subjective quality rating
    #[serde(rename = "sleep_quality")]
    pub sleep_quality: SleepQuality,
}

impl SleepRecord {
    /// Build a record, deriving the stored duration from the clock times
    ///
    /// Clock times are kept at minute precision, matching their encoding.
    pub fn new(
        date: NaiveDate,
        bedtime: NaiveTime,
        waketime: NaiveTime,
        sleep_quality: SleepQuality,
    ) -> Self {
        let bedtime = truncate_to_minute(bedtime);
        let waketime = truncate_to_minute(waketime);
        let hours = compute_duration(bedtime, waketime);

        SleepRecord {
            date,
            bedtime,
            waketime,
            sleep_duration_hours: round_hours(hours),
            sleep_quality,
        }
    }

    /// Wall-clock hour of bedtime (0-23)
    pub fn bedtime_hour(&self) -> u32 {
        self.bedtime.hour()
    }
}

/// Round hours to the stored precision, ties to even
pub fn round_hours(hours: f64) -> f64 {
    Decimal::from_f64(hours)
        .map(|d| d.round_dp(DURATION_DECIMAL_PLACES))
        .and_then(|d| d.to_f64())
        .unwrap_or(hours)
}

/// Drop seconds and sub-second precision from a clock time
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`)
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            input: input.to_string(),
        }
    })
}

/// Parse a 24-hour clock time (`HH:MM`)
pub fn parse_clock(input: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(input.trim(), CLOCK_FORMAT).map_err(|_| {
        ValidationError::InvalidTime {
            input: input.to_string(),
        }
    })
}

// `HH:MM` encoding for clock times
mod clock_serde {
    use super::CLOCK_FORMAT;
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(CLOCK_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, CLOCK_FORMAT)
            .map_err(|e| de::Error::custom(format!("invalid clock time '{}': {}", raw, e)))
    }
}

// Stored durations must be finite and non-negative
mod hours_serde {
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hours = f64::deserialize(deserializer)?;
        if !hours.is_finite() || hours < 0.0 {
            return Err(de::Error::custom(format!(
                "invalid sleep duration {}: must be a non-negative number of hours",
                hours
            )));
        }
        Ok(hours)
    }
}
