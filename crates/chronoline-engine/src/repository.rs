//! Persistence port for the event store.
//!
//! The store talks to a [`Repository`] instead of touching storage
//! directly. [`FileRepository`] keeps one JSON file per key with atomic
//! writes; [`MemoryRepository`] backs tests and headless runs.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, warn};

use crate::record::EventRecord;

/// Key under which the event list is stored by default.
pub const DEFAULT_STORAGE_KEY: &str = "timeline-events";

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stored events are corrupt: {0}")]
    Corrupt(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Load/save access to the persisted event list.
pub trait Repository: Send {
    /// Load the stored events.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet and
    /// [`RepositoryError::Corrupt`] when the stored value cannot be parsed.
    fn load(&self) -> Result<Option<Vec<EventRecord>>, RepositoryError>;

    /// Replace the stored events with `records`.
    fn save(&self, records: &[EventRecord]) -> Result<(), RepositoryError>;

    /// Move a corrupt stored value out of the way.
    ///
    /// Returns where the old value was kept, if anywhere.
    fn quarantine(&self) -> Result<Option<PathBuf>, RepositoryError>;

    /// Human-readable location of the stored value.
    fn describe(&self) -> String;
}

/// Stores the event list as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileRepository {
    path: PathBuf,
}

impl FileRepository {
    /// Create a repository for `key` inside `dir`, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Result<Self, RepositoryError> {
        validate_key(key)?;
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(format!("{key}.json")),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Repository for FileRepository {
    fn load(&self) -> Result<Option<Vec<EventRecord>>, RepositoryError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let records: Vec<EventRecord> = serde_json::from_str(&content)
            .map_err(|e| RepositoryError::Corrupt(e.to_string()))?;
        debug!(path = %self.path.display(), count = records.len(), "Loaded events");
        Ok(Some(records))
    }

    fn save(&self, records: &[EventRecord]) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(records)?;
        atomic_write(&self.path, json.as_bytes())?;
        debug!(path = %self.path.display(), count = records.len(), "Saved events");
        Ok(())
    }

    fn quarantine(&self) -> Result<Option<PathBuf>, RepositoryError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("events.json");
        let backup = self
            .path
            .with_file_name(format!("{file_name}.corrupt-{timestamp}"));

        fs::rename(&self.path, &backup)?;
        warn!(backup = %backup.display(), "Moved corrupt event store aside");
        Ok(Some(backup))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory repository holding the raw serialized value.
///
/// Clones share the same value, so a test can keep a handle and inspect
/// what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    value: Arc<Mutex<Option<String>>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository that already holds `raw`.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The currently stored raw value.
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Drop the stored value, as if it was deleted externally.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Repository for MemoryRepository {
    fn load(&self) -> Result<Option<Vec<EventRecord>>, RepositoryError> {
        match self.lock().as_deref() {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| RepositoryError::Corrupt(e.to_string())),
        }
    }

    fn save(&self, records: &[EventRecord]) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(records)?;
        *self.lock() = Some(json);
        Ok(())
    }

    fn quarantine(&self) -> Result<Option<PathBuf>, RepositoryError> {
        self.clear();
        Ok(None)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Validate a storage key for filesystem safety.
fn validate_key(key: &str) -> Result<(), RepositoryError> {
    if key.is_empty() {
        return Err(RepositoryError::InvalidKey("key cannot be empty".to_string()));
    }

    for ch in key.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_' {
            return Err(RepositoryError::InvalidKey(format!(
                "key contains invalid character: {ch}"
            )));
        }
    }

    Ok(())
}

/// Write content atomically using temp file + fsync + rename.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let pid = std::process::id();

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    let tmp_path = path.with_file_name(format!("{file_name}.{timestamp}.{pid}.tmp"));

    let result = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        // Best-effort cleanup
        let _ = fs::remove_file(&tmp_path);
    }

    result
}
