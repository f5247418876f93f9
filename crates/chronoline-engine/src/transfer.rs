//! Import and export of the full event list as flat JSON documents.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::record::EventRecord;
use crate::repository::atomic_write;
use crate::validate::{check_records, RecordIssue};

/// File name used for exports.
pub const EXPORT_FILE_NAME: &str = "timeline-export.json";

/// Errors while writing an export.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons an import document is refused. The store is never touched.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Could not read import file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Import file is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Import file must contain a JSON array of events")]
    NotAnArray,

    #[error("Import rejected: {} invalid record(s)", .0.len())]
    InvalidRecords(Vec<RecordIssue>),
}

/// What to do with invalid elements of an imported array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Refuse the whole import if any element is invalid.
    #[default]
    RejectAll,
    /// Import the valid elements and report the rest.
    SkipInvalid,
}

/// A successfully parsed import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub records: Vec<EventRecord>,
    /// Elements left out under [`ImportPolicy::SkipInvalid`].
    pub skipped: Vec<RecordIssue>,
}

/// Serialize records as a pretty-printed JSON array.
pub fn export_json(records: &[EventRecord]) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write [`EXPORT_FILE_NAME`] into `dir`, returning the written path.
pub fn export_to_dir(dir: &Path, records: &[EventRecord]) -> Result<PathBuf, TransferError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    let json = export_json(records)?;
    atomic_write(&path, json.as_bytes())?;
    info!(path = %path.display(), count = records.len(), "Exported events");
    Ok(path)
}

/// Parse an import document.
pub fn parse_import(text: &str, policy: ImportPolicy) -> Result<ImportOutcome, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Malformed)?;
    let Value::Array(values) = value else {
        return Err(ImportError::NotAnArray);
    };

    let (records, issues) = check_records(values);

    if !issues.is_empty() {
        match policy {
            ImportPolicy::RejectAll => return Err(ImportError::InvalidRecords(issues)),
            ImportPolicy::SkipInvalid => {
                for issue in &issues {
                    warn!(%issue, "Skipping invalid imported record");
                }
            }
        }
    }

    Ok(ImportOutcome {
        records,
        skipped: issues,
    })
}

/// Read and parse an import file.
pub fn import_from_file(path: &Path, policy: ImportPolicy) -> Result<ImportOutcome, ImportError> {
    let text = fs::read_to_string(path)?;
    parse_import(&text, policy)
}
