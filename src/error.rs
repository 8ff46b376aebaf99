//! Unified error hierarchy for SleepLog
//!
//! Structured error information for validation, storage, aggregation and
//! export, with severity levels that map onto the tracing system.

use std::path::PathBuf;
use thiserror::Error;

use crate::export::ExportError;

/// Top-level error type for all SleepLog operations
#[derive(Debug, Error)]
pub enum SleepLogError {
    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Aggregation errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Rejected observation input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Quality rating outside 1..=5
    #[error("Sleep quality must be between 1 and 5, got {value}")]
    QualityOutOfRange { value: i64 },

    /// Not an ISO-8601 calendar date
    #[error("Invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate { input: String },

    /// Not a 24-hour HH:MM clock time
    #[error("Invalid time '{input}', expected HH:MM")]
    InvalidTime { input: String },

    /// Duration below zero handed to the advice engine
    #[error("Sleep duration cannot be negative: {hours}")]
    NegativeDuration { hours: f64 },
}

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store exists but cannot be read
    #[error("Cannot read record store {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store exists but its content does not decode
    #[error("Corrupted record store {path}: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    /// Persisting the collection failed
    #[error("Failed to write record store {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

/// Aggregation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// No records to aggregate
    #[error("No records available for {calculation}")]
    EmptyWindow { calculation: String },
}

/// Result type alias for SleepLog operations
pub type Result<T> = std::result::Result<T, SleepLogError>;

impl SleepLogError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SleepLogError::Store(StoreError::Unreadable { .. })
                | SleepLogError::Store(StoreError::WriteFailed { .. })
                | SleepLogError::Io(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SleepLogError::Validation(_) => ErrorSeverity::Warning,
            SleepLogError::Calculation(_) => ErrorSeverity::Info,
            SleepLogError::Store(StoreError::Corrupted { .. }) => ErrorSeverity::Critical,
            SleepLogError::Store(_) => ErrorSeverity::Error,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            SleepLogError::Validation(err) => err.to_string(),
            SleepLogError::Store(StoreError::Corrupted { path, .. }) => {
                format!(
                    "Sleep data file {} is damaged and could not be loaded. Fix or move it before recording again.",
                    path.display()
                )
            }
            SleepLogError::Store(StoreError::Unreadable { path, .. }) => {
                format!("Could not read sleep data file: {}", path.display())
            }
            SleepLogError::Calculation(CalculationError::EmptyWindow { .. }) => {
                "No sleep data yet. Record a night first.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Data loss risk, requires attention
    Critical,
    /// Error that prevents operation
    Error,
    /// Rejected input, nothing changed
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = SleepLogError::Validation(ValidationError::QualityOutOfRange { value: 9 });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = SleepLogError::Store(StoreError::Corrupted {
            path: PathBuf::from("sleep_data.json"),
            reason: "expected value".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_error_retryable() {
        let err = SleepLogError::Store(StoreError::WriteFailed {
            path: PathBuf::from("sleep_data.json"),
            reason: "disk full".to_string(),
        });
        assert!(err.is_retryable());

        let err = SleepLogError::Validation(ValidationError::InvalidTime {
            input: "25:00".to_string(),
        });
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let err = SleepLogError::Store(StoreError::Corrupted {
            path: PathBuf::from("sleep_data.json"),
            reason: "trailing comma".to_string(),
        });
        assert!(err.user_message().contains("damaged"));

        let err = SleepLogError::from(ValidationError::QualityOutOfRange { value: 0 });
        assert_eq!(err.user_message(), "Sleep quality must be between 1 and 5, got 0");
    }
}
