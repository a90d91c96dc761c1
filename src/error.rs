use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which input collection a malformed row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Attendance,
    Directory,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Attendance => f.write_str("attendance"),
            RecordKind::Directory => f.write_str("directory"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    /// A required field is missing or does not parse. Aborts the whole batch.
    #[error("Invalid {kind} record at row {index}: {reason}")]
    InvalidRecord {
        kind: RecordKind,
        index: usize,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The input file extension is neither `.csv` nor `.json`.
    #[error("Unsupported input file: {0}")]
    UnsupportedInput(PathBuf),
}

impl ReportError {
    pub fn invalid(kind: RecordKind, index: usize, reason: impl Into<String>) -> Self {
        ReportError::InvalidRecord {
            kind,
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_record_display_names_kind_and_row() {
        let err = ReportError::invalid(RecordKind::Attendance, 4, "missing date");
        assert_eq!(err.to_string(), "Invalid attendance record at row 4: missing date");
    }

    #[test]
    fn io_display_includes_path() {
        let err = ReportError::Io {
            path: PathBuf::from("/data/attendance.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/attendance.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn json_errors_convert() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops}").unwrap_err();
        let err: ReportError = json_err.into();
        assert!(err.to_string().starts_with("Failed to parse JSON"));
    }
}
