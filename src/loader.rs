use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{ReportError, Result};
use crate::models::{RawAttendanceRecord, RawDirectoryEntry};

/// Read attendance rows from a `.csv` or `.json` file without validating them.
pub fn load_attendance(path: &Path) -> Result<Vec<RawAttendanceRecord>> {
    load_rows(path)
}

pub fn load_directory(path: &Path) -> Result<Vec<RawDirectoryEntry>> {
    load_rows(path)
}

fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let rows = match extension.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("json") => read_json(path)?,
        _ => return Err(ReportError::UnsupportedInput(path.to_path_buf())),
    };

    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded input rows");
    Ok(rows)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(open(path)?);

    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        rows.push(result?);
    }
    Ok(rows)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
