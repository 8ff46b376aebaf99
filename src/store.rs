//! Record store adapters
//!
//! The core only needs to load the whole collection and save the whole
//! collection back. A missing store means "no data yet" and loads as an empty
//! collection; a store that exists but cannot be read or decoded is an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::models::SleepRecord;

/// Whole-collection persistence for sleep records
pub trait RecordStore {
    /// Load every persisted record
    fn load_all(&self) -> Result<Vec<SleepRecord>, StoreError>;

    /// Replace the persisted collection with `records`
    fn save_all(&mut self, records: &[SleepRecord]) -> Result<(), StoreError>;
}

/// JSON array file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "sleep_data.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_failed(&self, reason: impl ToString) -> StoreError {
        StoreError::WriteFailed {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl RecordStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<SleepRecord>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No record store yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Unreadable {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let records: Vec<SleepRecord> =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupted {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "Loaded sleep records"
        );
        Ok(records)
    }

    fn save_all(&mut self, records: &[SleepRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_failed(e))?;
        }

        let json = serde_json::to_string_pretty(records).map_err(|e| self.write_failed(e))?;

        // Write beside the target and rename so readers never see a partial file
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| self.write_failed(e))?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(self.write_failed(e));
        }

        tracing::info!(
            path = %self.path.display(),
            count = records.len(),
            "Saved sleep records"
        );
        Ok(())
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<SleepRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<SleepRecord>) -> Self {
        Self { records }
    }
}

impl RecordStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<SleepRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn save_all(&mut self, records: &[SleepRecord]) -> Result<(), StoreError> {
        self.records = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_clock, parse_date, SleepQuality};
    use tempfile::tempdir;

    fn record(date: &str, quality: i64) -> SleepRecord {
        SleepRecord::new(
            parse_date(date).unwrap(),
            parse_clock("23:30").unwrap(),
            parse_clock("07:00").unwrap(),
            SleepQuality::new(quality).unwrap(),
        )
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("sleep_data.json"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("sleep_data.json"));
        let records = vec![record("2024-03-01", 4), record("2024-03-02", 2)];

        store.save_all(&records).unwrap();
        assert_eq!(store.load_all().unwrap(), records);
        assert!(!store.temp_path().exists());

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"sleep_duration\": 7.5"));
        assert!(raw.contains("\"bedtime\": \"23:30\""));
    }

    #[test]
    fn test_reads_files_from_earlier_versions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sleep_data.json");
        fs::write(
            &path,
            r#"[
  {
    "date": "2024-03-01",
    "bedtime": "23:00",
    "waketime": "07:00",
    "sleep_duration": 8.0,
    "sleep_quality": 3
  }
]"#,
        )
        .unwrap();

        let records = JsonFileStore::new(&path).load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sleep_quality.value(), 3);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sleep_data.json");
        fs::write(&path, "[{\"date\": \"2024-03-01\",").unwrap();

        let err = JsonFileStore::new(&path).load_all().unwrap_err();
        assert!(matches!(err, StoreError::Corrupted { .. }));
    }

    #[test]
    fn test_out_of_range_quality_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sleep_data.json");
        fs::write(
            &path,
            r#"[{"date":"2024-03-01","bedtime":"23:00","waketime":"07:00","sleep_duration":8.0,"sleep_quality":0}]"#,
        )
        .unwrap();

        let err = JsonFileStore::new(&path).load_all().unwrap_err();
        assert!(matches!(err, StoreError::Corrupted { .. }));
    }

    #[test]
    fn test_negative_duration_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sleep_data.json");
        fs::write(
            &path,
            r#"[{"date":"2024-03-01","bedtime":"23:00","waketime":"07:00","sleep_duration":-3.0,"sleep_quality":3}]"#,
        )
        .unwrap();

        let err = JsonFileStore::new(&path).load_all().unwrap_err();
        assert!(matches!(err, StoreError::Corrupted { .. }));
    }

    #[test]
    fn test_sub_minute_times_survive_reload() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("sleep_data.json"));
        let record = SleepRecord::new(
            parse_date("2024-03-01").unwrap(),
            chrono::NaiveTime::from_hms_opt(23, 0, 40).unwrap(),
            parse_clock("07:00").unwrap(),
            SleepQuality::new(4).unwrap(),
        );

        store.save_all(&[record.clone()]).unwrap();
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, vec![record]);
        assert_eq!(
            loaded[0].sleep_duration_hours,
            crate::duration::compute_duration(loaded[0].bedtime, loaded[0].waketime)
        );
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempdir().unwrap();
        // A non-empty directory at the target path makes the rename fail
        let target = dir.path().join("sleep_data.json");
        fs::create_dir_all(target.join("occupied")).unwrap();
        let mut store = JsonFileStore::new(&target);

        let err = store.save_all(&[record("2024-03-01", 4)]).unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed { .. }));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_directory_is_unreadable() {
        let dir = tempdir().unwrap();
        let err = JsonFileStore::new(dir.path()).load_all().unwrap_err();
        assert!(matches!(err, StoreError::Unreadable { .. }));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.load_all().unwrap().is_empty());
        store.save_all(&[record("2024-03-01", 5)]).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);

        let seeded = MemoryStore::with_records(vec![record("2024-03-01", 2), record("2024-03-02", 3)]);
        assert_eq!(seeded.load_all().unwrap().len(), 2);
    }
}
