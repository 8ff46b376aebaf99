//! Sleep journal: records observations and derives advice
//!
//! Ties the pieces together the way an embedding surface uses them: compute
//! the duration, merge the record into the stored collection, persist the
//! whole collection, then advise on the newest record and, once enough nights
//! exist, on the most recent window.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::advice::{advise_for, advise_for_trend, Advice};
use crate::error::Result;
use crate::models::{SleepQuality, SleepRecord};
use crate::stats::{newest_first, recent_window, summarize, SleepSummary};
use crate::store::RecordStore;
use crate::upsert::{upsert, UpsertOutcome};

/// Default trend window in nights
pub const DEFAULT_TREND_WINDOW: usize = 7;

/// Result of recording one observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recorded {
    pub record: SleepRecord,
    pub outcome: UpsertOutcome,
}

/// Sleep journal over a record store
pub struct SleepJournal<S: RecordStore> {
    store: S,
    trend_window: usize,
}

impl<S: RecordStore> SleepJournal<S> {
    pub fn new(store: S) -> Self {
        Self::with_trend_window(store, DEFAULT_TREND_WINDOW)
    }

    /// A window of zero is treated as one night
    pub fn with_trend_window(store: S, trend_window: usize) -> Self {
        Self {
            store,
            trend_window: trend_window.max(1),
        }
    }

    pub fn trend_window(&self) -> usize {
        self.trend_window
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record one night, replacing any record for the same date
    pub fn record(
        &mut self,
        date: NaiveDate,
        bedtime: NaiveTime,
        waketime: NaiveTime,
        quality: SleepQuality,
    ) -> Result<Recorded> {
        let record = SleepRecord::new(date, bedtime, waketime, quality);

        let existing = self.store.load_all()?;
        let (records, outcome) = upsert(existing, record.clone());
        self.store.save_all(&records)?;

        tracing::info!(
            date = %record.date,
            hours = record.sleep_duration_hours,
            quality = record.sleep_quality.value(),
            %outcome,
            "Recorded sleep"
        );

        Ok(Recorded { record, outcome })
    }

    /// All records, newest first
    pub fn records_newest_first(&self) -> Result<Vec<SleepRecord>> {
        Ok(newest_first(&self.store.load_all()?))
    }

    /// Advice for the most recent night, `None` when there is no data yet
    pub fn latest_advice(&self) -> Result<Option<Vec<Advice>>> {
        let records = self.store.load_all()?;
        Ok(records.iter().max_by_key(|r| r.date).map(advise_for))
    }

    /// Trend advice over the most recent window, `None` until the window fills
    pub fn trend_advice(&self) -> Result<Option<Vec<Advice>>> {
        let records = self.store.load_all()?;
        if records.len() < self.trend_window {
            tracing::debug!(
                records = records.len(),
                window = self.trend_window,
                "Not enough records for trend advice"
            );
            return Ok(None);
        }

        let window = recent_window(&records, self.trend_window);
        Ok(Some(advise_for_trend(&window)?))
    }

    /// Overall summary, `None` when there is no data yet
    pub fn summary(&self) -> Result<Option<SleepSummary>> {
        Ok(summarize(&self.store.load_all()?))
    }
}
