//! Insert-or-replace of sleep records keyed by calendar date
//!
//! A collection holds at most one record per date. Replacing keeps the
//! existing record's position, inserting appends. Nothing is sorted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::SleepRecord;

/// What the upsert did with the new record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    /// No record existed for the date; appended
    Inserted,
    /// A record for the date was replaced in place
    Updated,
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertOutcome::Inserted => write!(f, "inserted"),
            UpsertOutcome::Updated => write!(f, "updated"),
        }
    }
}

/// Merge `new_record` into `records`, last write wins per date
///
/// Assumes `records` already holds at most one record per date.
pub fn upsert(
    mut records: Vec<SleepRecord>,
    new_record: SleepRecord,
) -> (Vec<SleepRecord>, UpsertOutcome) {
    match records.iter().position(|r| r.date == new_record.date) {
        Some(index) => {
            records[index] = new_record;
            (records, UpsertOutcome::Updated)
        }
        None => {
            records.push(new_record);
            (records, UpsertOutcome::Inserted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_clock, SleepQuality};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn record(day: u32, bed: &str, wake: &str, quality: i64) -> SleepRecord {
        SleepRecord::new(
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            parse_clock(bed).unwrap(),
            parse_clock(wake).unwrap(),
            SleepQuality::new(quality).unwrap(),
        )
    }

    #[test]
    fn test_insert_appends() {
        let existing = vec![record(2, "23:00", "07:00", 3)];
        let (records, outcome) = upsert(existing, record(1, "22:00", "06:00", 4));

        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].date.to_string(), "2024-03-01");
    }

    #[test]
    fn test_update_replaces_in_place() {
        let existing = vec![
            record(1, "23:00", "07:00", 3),
            record(2, "23:00", "07:00", 3),
            record(3, "23:00", "07:00", 3),
        ];
        let replacement = record(2, "01:00", "05:00", 1);
        let (records, outcome) = upsert(existing, replacement.clone());

        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(records.len(), 3);
        assert_eq!(records[1], replacement);
        assert_eq!(records[1].sleep_duration_hours, 4.0);
    }

    #[test]
    fn test_insert_into_empty() {
        let (records, outcome) = upsert(Vec::new(), record(5, "23:00", "07:00", 5));
        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_reapplying_is_noop() {
        let existing = vec![record(1, "23:00", "07:00", 3)];
        let x = record(2, "22:30", "06:30", 4);

        let (once, first) = upsert(existing, x.clone());
        let (twice, second) = upsert(once.clone(), x);

        assert_eq!(first, UpsertOutcome::Inserted);
        assert_eq!(second, UpsertOutcome::Updated);
        assert_eq!(once, twice);
    }

    fn observation() -> impl Strategy<Value = SleepRecord> {
        (1u32..=10, 0u32..24, 0u32..24, 1i64..=5).prop_map(|(day, bed, wake, q)| {
            record(day, &format!("{:02}:00", bed), &format!("{:02}:30", wake), q)
        })
    }

    proptest! {
        #[test]
        fn test_dates_stay_unique(sequence in prop::collection::vec(observation(), 0..40)) {
            let mut records = Vec::new();
            for r in sequence.iter().cloned() {
                records = upsert(records, r).0;
            }

            let distinct: HashSet<_> = sequence.iter().map(|r| r.date).collect();
            let stored: HashSet<_> = records.iter().map(|r| r.date).collect();
            prop_assert_eq!(records.len(), distinct.len());
            prop_assert_eq!(stored, distinct);

            // Last write wins for every date
            for r in &records {
                let last = sequence.iter().rev().find(|s| s.date == r.date).unwrap();
                prop_assert_eq!(r, last);
            }
        }

        #[test]
        fn test_idempotent(sequence in prop::collection::vec(observation(), 0..20), x in observation()) {
            let mut records = Vec::new();
            for r in sequence {
                records = upsert(records, r).0;
            }
            let (once, _) = upsert(records, x.clone());
            let (twice, outcome) = upsert(once.clone(), x);
            prop_assert_eq!(outcome, UpsertOutcome::Updated);
            prop_assert_eq!(once, twice);
        }
    }
}
