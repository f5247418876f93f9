//! chronoline-engine: Headless engine for the chronoline personal timeline
//!
//! This crate provides everything below the UI:
//! - The event record model and form parsing
//! - The event store and its repository port
//! - JSON import/export with per-record validation
//! - Configuration and period formatting

pub mod config;
pub mod draft;
pub mod period;
pub mod record;
pub mod repository;
pub mod store;
pub mod transfer;
pub mod validate;

// Re-export commonly used types
pub use config::{Config, ConfigError, MapConfig, TimelineConfig};
pub use draft::{DraftError, EventDraft, EventFields, DATE_FORMAT};
pub use period::{display_date, Period};
pub use record::{EventId, EventRecord, Location};
pub use repository::{
    FileRepository, MemoryRepository, Repository, RepositoryError, DEFAULT_STORAGE_KEY,
};
pub use store::{EventStore, StartupReport, StoreError};
pub use transfer::{
    export_json, export_to_dir, import_from_file, parse_import, ImportError, ImportOutcome,
    ImportPolicy, TransferError, EXPORT_FILE_NAME,
};
pub use validate::RecordIssue;

/// Open the event store described by `config`.
pub fn open_store(config: &Config) -> Result<(EventStore, StartupReport), StoreError> {
    let repo = FileRepository::new(&config.data_dir, &config.storage_key)?;
    EventStore::open(Box::new(repo))
}

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
