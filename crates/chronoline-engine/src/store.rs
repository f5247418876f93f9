//! The event store: single source of truth for event records.
//!
//! Every successful mutation saves the full record list through the
//! injected [`Repository`] and bumps [`EventStore::revision`], which views
//! compare against to know when to refresh.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::draft::EventDraft;
use crate::record::{EventId, EventRecord};
use crate::repository::{Repository, RepositoryError};
use crate::validate::check_stored;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Event not found: {0}")]
    NotFound(EventId),

    /// The in-memory change was applied but could not be saved.
    #[error("Change not saved: {0}")]
    Unsaved(#[source] RepositoryError),

    #[error("Failed to open event store: {0}")]
    Open(#[from] RepositoryError),
}

/// What happened while opening the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupReport {
    /// Nothing was stored yet.
    Fresh,
    /// Stored events were loaded.
    Loaded { count: usize },
    /// Stored events were unreadable and moved aside; the store starts empty.
    Recovered {
        backup: Option<PathBuf>,
        reason: String,
    },
}

/// In-memory event collection mirrored to a repository.
pub struct EventStore {
    records: Vec<EventRecord>,
    selected: Option<EventId>,
    /// Newly added record the timeline should focus once it has drawn it.
    pending_selection: Option<EventId>,
    revision: u64,
    repo: Box<dyn Repository>,
}

impl fmt::Debug for EventStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStore")
            .field("records", &self.records.len())
            .field("selected", &self.selected)
            .field("pending_selection", &self.pending_selection)
            .field("revision", &self.revision)
            .field("repo", &self.repo.describe())
            .finish()
    }
}

impl EventStore {
    /// Open the store, loading whatever the repository holds.
    ///
    /// A corrupt stored value is quarantined and the store starts empty.
    pub fn open(repo: Box<dyn Repository>) -> Result<(Self, StartupReport), StoreError> {
        let (records, report) = match repo.load() {
            Ok(None) => (Vec::new(), StartupReport::Fresh),
            Ok(Some(records)) => match check_stored(&records) {
                Ok(records) => {
                    let count = records.len();
                    (records, StartupReport::Loaded { count })
                }
                Err(issues) => {
                    let listed: Vec<String> = issues.iter().map(ToString::to_string).collect();
                    let reason = format!(
                        "{} invalid stored record(s): {}",
                        issues.len(),
                        listed.join("; ")
                    );
                    recover(&*repo, reason)?
                }
            },
            Err(RepositoryError::Corrupt(reason)) => recover(&*repo, reason)?,
            Err(e) => return Err(StoreError::Open(e)),
        };

        info!(store = %repo.describe(), count = records.len(), "Opened event store");

        let store = Self {
            records,
            selected: None,
            pending_selection: None,
            revision: 0,
            repo,
        };
        Ok((store, report))
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records ordered by start date, then title.
    pub fn chronological(&self) -> Vec<&EventRecord> {
        let mut sorted: Vec<&EventRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
        sorted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Look up a record by id.
    pub fn get(&self, id: &EventId) -> Option<&EventRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Where the records are persisted.
    pub fn location(&self) -> String {
        self.repo.describe()
    }

    /// The selected record id, if any.
    pub fn selected(&self) -> Option<&EventId> {
        self.selected.as_ref()
    }

    /// The selected record, if any.
    pub fn selected_record(&self) -> Option<&EventRecord> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Select a record. Unknown ids are ignored and return `false`.
    pub fn select(&mut self, id: &EventId) -> bool {
        if self.get(id).is_some() {
            self.selected = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Take the id of a freshly added record that still needs focusing.
    pub fn take_pending_selection(&mut self) -> Option<EventId> {
        self.pending_selection.take()
    }

    /// Append a new record built from `draft` and select it.
    ///
    /// On [`StoreError::Unsaved`] the record is still added and selected.
    pub fn add(&mut self, draft: EventDraft) -> Result<EventId, StoreError> {
        self.add_at(draft, Utc::now())
    }

    /// [`EventStore::add`] with an explicit creation instant.
    pub fn add_at(&mut self, draft: EventDraft, at: DateTime<Utc>) -> Result<EventId, StoreError> {
        let id = self.unique_id(at);
        let record = draft.into_record(id.clone());
        debug!(id = %id, title = %record.title, "Adding event");

        self.records.push(record);
        self.selected = Some(id.clone());
        self.pending_selection = Some(id.clone());
        self.commit()?;
        Ok(id)
    }

    /// Replace the fields of the record matching `id`, keeping its id.
    pub fn update(&mut self, id: &EventId, draft: EventDraft) -> Result<(), StoreError> {
        let Some(slot) = self.records.iter_mut().find(|r| &r.id == id) else {
            return Err(StoreError::NotFound(id.clone()));
        };

        let links_to = std::mem::take(&mut slot.links_to);
        let mut record = draft.into_record(id.clone());
        record.links_to = links_to;
        *slot = record;
        debug!(id = %id, "Updated event");

        self.commit()
    }

    /// Delete the record matching `id`.
    ///
    /// Clears the selection when it pointed at the removed record.
    pub fn remove(&mut self, id: &EventId) -> Result<EventRecord, StoreError> {
        let Some(index) = self.records.iter().position(|r| &r.id == id) else {
            return Err(StoreError::NotFound(id.clone()));
        };

        let removed = self.records.remove(index);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.pending_selection.as_ref() == Some(id) {
            self.pending_selection = None;
        }
        debug!(id = %id, "Removed event");

        self.commit()?;
        Ok(removed)
    }

    /// Discard all records and install `records` instead.
    pub fn replace_all(&mut self, records: Vec<EventRecord>) -> Result<(), StoreError> {
        info!(count = records.len(), "Replacing all events");
        self.records = records;
        self.selected = None;
        self.pending_selection = None;
        self.commit()
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.revision += 1;
        self.repo.save(&self.records).map_err(StoreError::Unsaved)
    }

    /// The creation-time id, nudged forward a millisecond at a time
    /// past any id already taken.
    fn unique_id(&self, mut at: DateTime<Utc>) -> EventId {
        loop {
            let id = EventId::from_timestamp(at);
            if self.get(&id).is_none() {
                return id;
            }
            at += TimeDelta::milliseconds(1);
        }
    }
}

/// Move a corrupt stored value aside and start empty.
fn recover(
    repo: &dyn Repository,
    reason: String,
) -> Result<(Vec<EventRecord>, StartupReport), StoreError> {
    warn!(store = %repo.describe(), %reason, "Stored events are corrupt");
    let backup = repo.quarantine()?;
    Ok((Vec::new(), StartupReport::Recovered { backup, reason }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::EventFields;
    use crate::record::Location;
    use crate::repository::MemoryRepository;
    use chrono::{NaiveDate, TimeZone};

    fn draft(title: &str, start: &str) -> EventDraft {
        EventDraft::parse(&EventFields {
            title: title.into(),
            start: start.into(),
            ..Default::default()
        })
        .unwrap()
    }

    fn open_empty() -> (MemoryRepository, EventStore) {
        let repo = MemoryRepository::new();
        let (store, report) = EventStore::open(Box::new(repo.clone())).unwrap();
        assert_eq!(report, StartupReport::Fresh);
        (repo, store)
    }

    fn stored(repo: &MemoryRepository) -> Vec<EventRecord> {
        serde_json::from_str(&repo.raw().unwrap()).unwrap()
    }

    #[test]
    fn test_add_selects_and_persists() {
        let (repo, mut store) = open_empty();

        let id = store.add(draft("Launch", "2024-01-01")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.selected(), Some(&id));
        assert_eq!(store.take_pending_selection(), Some(id.clone()));
        assert_eq!(store.take_pending_selection(), None);
        assert_eq!(stored(&repo), store.records());
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_launch_scenario() {
        let (_repo, mut store) = open_empty();
        let fields = EventFields {
            title: "Launch".into(),
            start: "2024-01-01".into(),
            lat: "0".into(),
            lng: "0".into(),
            ..Default::default()
        };

        let id = store.add(EventDraft::parse(&fields).unwrap()).unwrap();
        let record = store.selected_record().unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.end, None);
        assert_eq!(record.location, Some(Location::new("", 0.0, 0.0)));
    }

    #[test]
    fn test_ids_are_creation_timestamps_and_unique() {
        let (_repo, mut store) = open_empty();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let first = store.add_at(draft("A", "2024-01-01"), at).unwrap();
        let second = store.add_at(draft("B", "2024-01-02"), at).unwrap();

        assert_eq!(first.as_str(), "1704067200000");
        assert_eq!(second.as_str(), "1704067200001");
    }

    #[test]
    fn test_update_preserves_id() {
        let (repo, mut store) = open_empty();
        let id = store.add(draft("Draft", "2024-01-01")).unwrap();

        store.update(&id, draft("Final", "2024-02-02")).unwrap();

        let record = store.get(&id).unwrap();
        assert_eq!(record.title, "Final");
        assert_eq!(record.start, NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
        assert_eq!(stored(&repo)[0].title, "Final");
    }

    #[test]
    fn test_update_unknown_id() {
        let (_repo, mut store) = open_empty();
        let result = store.update(&EventId::new("missing"), draft("X", "2024-01-01"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let (repo, mut store) = open_empty();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let a = store.add_at(draft("A", "2024-01-01"), at).unwrap();
        let b = store.add_at(draft("B", "2024-01-02"), at).unwrap();
        store.select(&a);

        let removed = store.remove(&a).unwrap();

        assert_eq!(removed.id, a);
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.records()[0].id, b);
        assert!(store.selected().is_none());
        assert_eq!(stored(&repo).len(), 1);
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let (_repo, mut store) = open_empty();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let a = store.add_at(draft("A", "2024-01-01"), at).unwrap();
        let b = store.add_at(draft("B", "2024-01-02"), at).unwrap();

        store.remove(&a).unwrap();
        assert_eq!(store.selected(), Some(&b));
    }

    #[test]
    fn test_replace_all_discards_old_records() {
        let (repo, mut store) = open_empty();
        store.add(draft("Old", "2020-01-01")).unwrap();

        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let incoming = vec![EventRecord::new(EventId::new("n1"), "New", start)];
        store.replace_all(incoming.clone()).unwrap();

        assert_eq!(store.records(), incoming.as_slice());
        assert!(store.selected().is_none());
        assert!(store.take_pending_selection().is_none());
        assert_eq!(stored(&repo), incoming);
    }

    #[test]
    fn test_reopen_loads_saved_records() {
        let (repo, mut store) = open_empty();
        store.add(draft("Kept", "2024-01-01")).unwrap();

        let (reopened, report) = EventStore::open(Box::new(repo)).unwrap();
        assert_eq!(report, StartupReport::Loaded { count: 1 });
        assert_eq!(reopened.records()[0].title, "Kept");
    }

    #[test]
    fn test_deleted_storage_starts_empty() {
        let (repo, mut store) = open_empty();
        store.add(draft("Gone", "2024-01-01")).unwrap();
        repo.clear();

        let (reopened, report) = EventStore::open(Box::new(repo)).unwrap();
        assert_eq!(report, StartupReport::Fresh);
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_corrupt_storage_recovered_empty() {
        let repo = MemoryRepository::with_raw("not json");
        let (store, report) = EventStore::open(Box::new(repo.clone())).unwrap();

        assert!(store.is_empty());
        assert!(matches!(report, StartupReport::Recovered { backup: None, .. }));
        assert!(repo.raw().is_none());
    }

    #[test]
    fn test_duplicate_stored_ids_recovered_empty() {
        let repo = MemoryRepository::with_raw(
            r#"[{"id":"1","title":"A","start":"2024-01-01"},
                {"id":"1","title":"B","start":"2024-01-02"}]"#,
        );
        let (store, report) = EventStore::open(Box::new(repo.clone())).unwrap();

        assert!(store.is_empty());
        match report {
            StartupReport::Recovered { backup, reason } => {
                assert_eq!(backup, None);
                assert!(reason.contains("duplicate id"), "{reason}");
            }
            other => panic!("expected recovery, got {other:?}"),
        }
        assert!(repo.raw().is_none());
    }

    #[test]
    fn test_chronological_order() {
        let (_repo, mut store) = open_empty();
        store.add(draft("Late", "2024-06-01")).unwrap();
        store.add(draft("Early", "2023-01-01")).unwrap();

        let titles: Vec<&str> = store
            .chronological()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Early", "Late"]);
    }

    #[test]
    fn test_select_unknown_is_ignored() {
        let (_repo, mut store) = open_empty();
        assert!(!store.select(&EventId::new("nope")));
        assert!(store.selected().is_none());
    }
}
