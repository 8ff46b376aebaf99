// Library interface for SleepLog modules
// The CLI and integration tests both build on these

pub mod advice;
pub mod config;
pub mod duration;
pub mod error;
pub mod export;
pub mod journal;
pub mod logging;
pub mod models;
pub mod stats;
pub mod store;
pub mod upsert;

// Re-export commonly used types for convenience
pub use advice::{advise_for_record, advise_for_trend, Advice, AdviceCategory, AdviceKind, Polarity};
pub use config::AppConfig;
pub use duration::compute_duration;
pub use error::{Result, SleepLogError};
pub use journal::{Recorded, SleepJournal};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::{SleepQuality, SleepRecord};
pub use store::{JsonFileStore, MemoryStore, RecordStore};
pub use upsert::{upsert, UpsertOutcome};
