//! Application state and update logic for the chronoline TUI.

use crate::event::{key_to_action, Action};
use crate::panel::{EventForm, FormMode, FormOutcome, PanelMode};
use crate::timeline::{TimelineState, SCROLL_SPEED};
use crate::ui::widgets::TextInputState;
use chrono::Local;
use chronoline_engine::{
    export_to_dir, parse_import, Config, EventId, EventStore, ImportError, StartupReport,
    StoreError,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Ticks a notification stays visible (about 3 seconds at 4 Hz).
const NOTIFICATION_TICKS: usize = 12;

/// Issues listed in an alert before the rest are summarized.
const MAX_ALERT_ISSUES: usize = 8;

/// A blocking message the user must dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub lines: Vec<String>,
}

impl Alert {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }
}

type ImportResult = (PathBuf, io::Result<String>);

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    pub config: Config,

    /// The event store; single source of truth for records.
    pub store: EventStore,

    /// Timeline view state.
    pub timeline: TimelineState,

    /// Detail/edit panel mode.
    pub panel: PanelMode,

    /// Path prompt shown while choosing a file to import.
    pub import_prompt: Option<TextInputState>,

    /// Alerts waiting to be dismissed, oldest first.
    alerts: VecDeque<Alert>,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Tick counter.
    pub tick: usize,

    /// Store revision last pushed to the timeline.
    synced_revision: Option<u64>,

    /// Channel receiver for a background import read.
    import_rx: Option<oneshot::Receiver<ImportResult>>,
}

impl App {
    /// Create the app around an opened store.
    pub fn new(config: Config, store: EventStore, report: StartupReport) -> Self {
        let timeline = TimelineState::new(&config.timeline);
        let mut app = Self {
            should_quit: false,
            show_help: false,
            config,
            store,
            timeline,
            panel: PanelMode::Viewing,
            import_prompt: None,
            alerts: VecDeque::new(),
            notification: None,
            notification_ttl: 0,
            tick: 0,
            synced_revision: None,
            import_rx: None,
        };

        match report {
            StartupReport::Fresh => info!("Starting with an empty timeline"),
            StartupReport::Loaded { count } => info!(count, "Loaded events"),
            StartupReport::Recovered { backup, reason } => {
                let mut lines = vec![format!("Stored events could not be read: {reason}")];
                match backup {
                    Some(path) => lines.push(format!("The old data was moved to {}", path.display())),
                    None => lines.push("No backup could be kept.".to_string()),
                }
                lines.push("Starting with an empty timeline.".to_string());
                app.push_alert(Alert::new("Storage recovered", lines));
            }
        }

        app.sync_views();
        app
    }

    /// The alert currently shown, if any.
    pub fn alert(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    /// Number of alerts waiting to be dismissed.
    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    /// Whether an import file is still being read.
    pub fn import_in_progress(&self) -> bool {
        self.import_rx.is_some()
    }

    /// Short mode name for the status bar.
    pub fn mode_label(&self) -> &'static str {
        if self.alert().is_some() {
            "Alert"
        } else if self.import_prompt.is_some() {
            "Import"
        } else {
            self.panel.label()
        }
    }

    /// Handle a key press, routing it to whatever has focus.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if !self.alerts.is_empty() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.alerts.pop_front();
            }
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.import_prompt.is_some() {
            self.handle_import_prompt_key(key);
            return;
        }

        if let Some(form) = self.panel.form_mut() {
            match form.handle_key(key) {
                FormOutcome::Continue => {}
                FormOutcome::Submit => self.submit_form(),
                FormOutcome::Cancel => self.panel = PanelMode::Viewing,
            }
            return;
        }

        self.handle_action(key_to_action(key));
    }

    /// Handle a main-screen action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = true,
            Action::Add => self.open_add_form(),
            Action::Edit => self.open_edit_form(),
            Action::Delete => self.delete_selected(),
            Action::Export => self.export(),
            Action::Import => self.import_prompt = Some(TextInputState::new()),
            Action::Back => {
                self.store.clear_selection();
                self.timeline.set_selected(None);
                self.panel = PanelMode::Viewing;
            }
            Action::Left => {
                if let Some(id) = self.timeline.select_prev() {
                    self.select_event(&id);
                }
            }
            Action::Right => {
                if let Some(id) = self.timeline.select_next() {
                    self.select_event(&id);
                }
            }
            Action::First => {
                if let Some(id) = self.timeline.select_first() {
                    self.select_event(&id);
                }
            }
            Action::Last => {
                if let Some(id) = self.timeline.select_last() {
                    self.select_event(&id);
                }
            }
            Action::ScrollLeft => self.timeline.scroll(-SCROLL_SPEED),
            Action::ScrollRight => self.timeline.scroll(SCROLL_SPEED),
            Action::ZoomIn => self.timeline.zoom_in(),
            Action::ZoomOut => self.timeline.zoom_out(),
            Action::None => {}
        }
    }

    /// Handle a mouse event.
    ///
    /// A click on a timeline item selects it, leaving an open form without
    /// saving. Wheel scrolling only applies while viewing.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.alerts.is_empty() || self.import_prompt.is_some() {
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = self.timeline.item_at(mouse.column, mouse.row) {
                    self.select_event(&id);
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft if self.panel.is_viewing() => {
                self.timeline.scroll(-SCROLL_SPEED);
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight
                if self.panel.is_viewing() =>
            {
                self.timeline.scroll(SCROLL_SPEED);
            }
            _ => {}
        }
    }

    /// Select the record with `id` and show it read-only.
    pub fn select_event(&mut self, id: &EventId) {
        if self.store.select(id) {
            self.timeline.select(id);
            self.panel = PanelMode::Viewing;
        }
    }

    /// Push store changes to the timeline.
    pub fn sync_views(&mut self) {
        let revision = self.store.revision();
        if self.synced_revision != Some(revision) {
            self.timeline.set_items(self.store.records());
            self.synced_revision = Some(revision);
        }
        self.timeline.set_selected(self.store.selected().cloned());

        if let Some(id) = self.store.take_pending_selection() {
            self.timeline.focus_when_rendered(id);
        }
    }

    fn open_add_form(&mut self) {
        self.panel = PanelMode::Adding(EventForm::add(Local::now().date_naive()));
    }

    fn open_edit_form(&mut self) {
        match self.store.selected_record() {
            Some(record) => self.panel = PanelMode::Editing(EventForm::edit(record)),
            None => self.set_notification("Select an event to edit".to_string()),
        }
    }

    /// Save the open form through the store.
    fn submit_form(&mut self) {
        let Some(form) = self.panel.form() else {
            return;
        };

        let draft = match form.parse() {
            Ok(draft) => draft,
            Err(e) => {
                if let Some(form) = self.panel.form_mut() {
                    form.set_error(e.to_string());
                }
                return;
            }
        };

        match form.mode().clone() {
            FormMode::Add => match self.store.add(draft) {
                Ok(_) => self.set_notification("Event added".to_string()),
                Err(e) => self.report_store_error(&e),
            },
            FormMode::Edit(id) => {
                match self.store.update(&id, draft) {
                    Ok(()) => self.set_notification("Event saved".to_string()),
                    Err(e) => self.report_store_error(&e),
                }
                self.store.select(&id);
            }
        }

        self.panel = PanelMode::Viewing;
        self.sync_views();
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.store.selected().cloned() else {
            self.set_notification("Select an event to delete".to_string());
            return;
        };

        match self.store.remove(&id) {
            Ok(record) => self.set_notification(format!("Deleted \"{}\"", record.title)),
            Err(e) => self.report_store_error(&e),
        }
        self.panel = PanelMode::Viewing;
        self.sync_views();
    }

    /// Write all records to the export directory.
    pub fn export(&mut self) {
        match export_to_dir(&self.config.export_dir, self.store.records()) {
            Ok(path) => {
                info!(path = %path.display(), count = self.store.len(), "Exported events");
                self.set_notification(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "Export failed");
                self.push_alert(Alert::new("Export failed", vec![e.to_string()]));
            }
        }
    }

    fn handle_import_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.import_prompt.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.import_prompt = None,
            KeyCode::Enter => {
                let path = prompt.take().trim().to_string();
                self.import_prompt = None;
                if !path.is_empty() {
                    self.start_import(PathBuf::from(path));
                }
            }
            _ => {
                prompt.handle_key(key);
            }
        }
    }

    /// Read `path` on a background task; the result is picked up on a
    /// later tick.
    pub fn start_import(&mut self, path: PathBuf) {
        if self.import_rx.is_some() {
            self.set_notification("An import is already running".to_string());
            return;
        }

        let (tx, rx) = oneshot::channel();
        self.import_rx = Some(rx);
        info!(path = %path.display(), "Reading import file");

        tokio::spawn(async move {
            let result = tokio::fs::read_to_string(&path).await;
            // Ignore error if receiver was dropped (app quit)
            let _ = tx.send((path, result));
        });
        self.set_notification("Importing...".to_string());
    }

    /// Apply the outcome of reading an import file.
    ///
    /// Any failure raises exactly one alert and leaves the store untouched.
    pub fn finish_import(&mut self, path: &Path, result: io::Result<String>) {
        let text = match result {
            Ok(text) => text,
            Err(e) => {
                let error = ImportError::Read(e);
                warn!(path = %path.display(), error = %error, "Import failed");
                self.push_alert(Alert::new("Import failed", vec![error.to_string()]));
                return;
            }
        };

        let outcome = match parse_import(&text, self.config.import_policy) {
            Ok(outcome) => outcome,
            Err(ImportError::InvalidRecords(issues)) => {
                warn!(path = %path.display(), issues = issues.len(), "Import rejected");
                let mut lines = vec![format!(
                    "{} record(s) are invalid; nothing was imported.",
                    issues.len()
                )];
                lines.extend(issues.iter().take(MAX_ALERT_ISSUES).map(ToString::to_string));
                if issues.len() > MAX_ALERT_ISSUES {
                    lines.push(format!("...and {} more", issues.len() - MAX_ALERT_ISSUES));
                }
                self.push_alert(Alert::new("Import rejected", lines));
                return;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Import failed");
                self.push_alert(Alert::new("Import failed", vec![e.to_string()]));
                return;
            }
        };

        let count = outcome.records.len();
        let skipped = outcome.skipped.len();
        let saved = self.store.replace_all(outcome.records);
        self.panel = PanelMode::Viewing;
        self.sync_views();
        self.timeline.reset_window();

        if let Err(e) = saved {
            self.report_store_error(&e);
        } else if skipped > 0 {
            self.set_notification(format!(
                "Imported {count} events, skipped {skipped} invalid"
            ));
        } else {
            self.set_notification(format!("Imported {count} events"));
        }
    }

    fn poll_import(&mut self) {
        let Some(rx) = self.import_rx.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok((path, result)) => {
                self.import_rx = None;
                self.finish_import(&path, result);
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                // Reader task went away without answering
                self.import_rx = None;
                self.push_alert(Alert::new(
                    "Import failed",
                    vec!["The import file could not be read.".to_string()],
                ));
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
        }
    }

    fn report_store_error(&mut self, error: &StoreError) {
        warn!(error = %error, "Store operation failed");
        self.set_notification(error.to_string());
    }

    fn push_alert(&mut self, alert: Alert) {
        self.alerts.push_back(alert);
    }

    /// Set a temporary notification message.
    fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }

        self.timeline.tick();
        self.poll_import();
    }
}

#[cfg(test)]
impl App {
    /// An app backed by an in-memory repository.
    pub fn new_for_test() -> Self {
        Self::with_repository(chronoline_engine::MemoryRepository::new())
    }

    /// An app opened over `repo`.
    pub fn with_repository(repo: chronoline_engine::MemoryRepository) -> Self {
        let (store, report) = EventStore::open(Box::new(repo)).unwrap();
        Self::new(Config::default(), store, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::FormField;
    use crate::test_utils::render_screen_to_string;
    use chronoline_engine::{ImportPolicy, Location, MemoryRepository};
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_s() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    fn add_event(app: &mut App, fields: &[(FormField, &str)]) {
        app.handle_key(key(KeyCode::Char('a')));
        let Some(form) = app.panel.form_mut() else {
            panic!("add form not open");
        };
        for (field, value) in fields {
            form.set(*field, *value);
        }
        app.handle_key(ctrl_s());
    }

    fn add_titled(app: &mut App, title: &str, start: &str) -> EventId {
        add_event(app, &[(FormField::Title, title), (FormField::Start, start)]);
        app.store.selected().cloned().unwrap()
    }

    #[test]
    fn test_add_selects_new_event() {
        let mut app = App::new_for_test();
        add_event(
            &mut app,
            &[
                (FormField::Title, "Launch"),
                (FormField::Start, "2024-01-01"),
                (FormField::End, ""),
                (FormField::Description, ""),
                (FormField::Image, ""),
                (FormField::LocationName, ""),
                (FormField::Latitude, "0"),
                (FormField::Longitude, "0"),
            ],
        );

        assert_eq!(app.store.len(), 1);
        let record = app.store.selected_record().unwrap();
        assert_eq!(record.title, "Launch");
        assert_eq!(record.end, None);
        assert_eq!(record.image, None);
        assert_eq!(record.location, Some(Location::new("", 0.0, 0.0)));
        assert!(app.panel.is_viewing());
        assert_eq!(app.timeline.len(), 1);
    }

    #[test]
    fn test_new_event_focused_after_render() {
        let mut app = App::new_for_test();
        let id = add_titled(&mut app, "Launch", "2024-01-01");
        assert_eq!(app.timeline.pending_focus(), Some(&id));

        render_screen_to_string(&mut app, 80, 30);
        assert_eq!(app.timeline.pending_focus(), None);
        assert_eq!(app.timeline.selected(), Some(&id));
    }

    #[test]
    fn test_invalid_form_saves_nothing() {
        let mut app = App::new_for_test();
        add_event(
            &mut app,
            &[
                (FormField::Title, "Launch"),
                (FormField::Latitude, "not a number"),
            ],
        );

        assert!(app.store.is_empty());
        let form = app.panel.form().unwrap();
        assert!(form.error().unwrap().contains("latitude"));

        app.handle_key(key(KeyCode::Esc));
        assert!(app.panel.is_viewing());
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_delete_selected() {
        let mut app = App::new_for_test();
        let a = add_titled(&mut app, "A", "2024-01-01");
        let b = add_titled(&mut app, "B", "2024-02-01");

        app.select_event(&a);
        app.handle_key(key(KeyCode::Char('d')));

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.records()[0].id, b);
        assert_eq!(app.store.selected(), None);
        assert_eq!(app.timeline.selected(), None);
        assert_eq!(app.timeline.len(), 1);
    }

    #[test]
    fn test_edit_preserves_id() {
        let mut app = App::new_for_test();
        let id = add_titled(&mut app, "Draft", "2024-01-01");

        app.handle_key(key(KeyCode::Char('e')));
        let Some(form) = app.panel.form_mut() else {
            panic!("edit form not open");
        };
        assert_eq!(form.value(FormField::Title), "Draft");
        form.set(FormField::Title, "Final");
        form.set(FormField::End, "2024-01-03");
        app.handle_key(ctrl_s());

        let record = app.store.selected_record().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.title, "Final");
        assert!(record.is_range());
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.timeline.items()[0].label, "Final");
    }

    #[test]
    fn test_arrow_keys_walk_the_timeline() {
        let mut app = App::new_for_test();
        let later = add_titled(&mut app, "Later", "2024-06-01");
        let earlier = add_titled(&mut app, "Earlier", "2024-01-01");

        app.handle_key(key(KeyCode::Home));
        assert_eq!(app.store.selected(), Some(&earlier));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.store.selected(), Some(&later));
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.store.selected(), Some(&earlier));
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut app = App::new_for_test();
        app.config.export_dir = temp.path().to_path_buf();
        add_titled(&mut app, "A", "2024-01-01");
        add_titled(&mut app, "B", "2024-02-01");
        let before = app.store.records().to_vec();

        app.handle_key(key(KeyCode::Char('x')));
        let path = temp.path().join(chronoline_engine::EXPORT_FILE_NAME);
        let text = std::fs::read_to_string(&path).unwrap();

        let mut other = App::new_for_test();
        other.finish_import(&path, Ok(text));
        assert_eq!(other.store.records(), before.as_slice());
        assert_eq!(other.alert_count(), 0);
        assert_eq!(other.timeline.len(), 2);
    }

    #[test]
    fn test_import_non_array_raises_one_alert() {
        let mut app = App::new_for_test();
        add_titled(&mut app, "Keep", "2024-01-01");

        app.finish_import(Path::new("events.json"), Ok(r#"{"id": "1"}"#.into()));
        assert_eq!(app.alert_count(), 1);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.mode_label(), "Alert");

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.alert_count(), 0);
    }

    #[test]
    fn test_import_malformed_raises_one_alert() {
        let mut app = App::new_for_test();
        app.finish_import(Path::new("events.json"), Ok("not json".into()));
        assert_eq!(app.alert_count(), 1);
        assert_eq!(app.alert().unwrap().title, "Import failed");
    }

    #[test]
    fn test_import_replaces_store() {
        let mut app = App::new_for_test();
        add_titled(&mut app, "Old", "2024-01-01");

        let doc = r#"[{"id": "n1", "title": "New", "start": "2023-05-05", "end": null}]"#;
        app.finish_import(Path::new("events.json"), Ok(doc.into()));

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.records()[0].title, "New");
        assert_eq!(app.store.selected(), None);
        assert_eq!(app.timeline.items()[0].label, "New");
        // The window moves to the imported events.
        assert_eq!(
            app.timeline.origin(),
            chrono::NaiveDate::from_ymd_opt(2023, 5, 3).unwrap()
        );
    }

    #[test]
    fn test_import_invalid_records_policies() {
        let doc = r#"[
            {"id": "1", "title": "Good", "start": "2024-01-01"},
            {"id": "2", "title": "", "start": "2024-01-02"}
        ]"#;

        let mut app = App::new_for_test();
        app.finish_import(Path::new("events.json"), Ok(doc.into()));
        assert_eq!(app.alert_count(), 1);
        assert_eq!(app.alert().unwrap().title, "Import rejected");
        assert!(app.store.is_empty());

        let mut app = App::new_for_test();
        app.config.import_policy = ImportPolicy::SkipInvalid;
        app.finish_import(Path::new("events.json"), Ok(doc.into()));
        assert_eq!(app.alert_count(), 0);
        assert_eq!(app.store.len(), 1);
        assert!(app.notification.as_deref().unwrap().contains("skipped 1"));
    }

    #[test]
    fn test_unreadable_import_file() {
        let mut app = App::new_for_test();
        let error = io::Error::new(io::ErrorKind::NotFound, "no such file");
        app.finish_import(Path::new("missing.json"), Err(error));
        assert_eq!(app.alert_count(), 1);
    }

    #[tokio::test]
    async fn test_import_prompt_reads_file_in_background() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.json");
        std::fs::write(
            &path,
            r#"[{"id": "1", "title": "From disk", "start": "2024-01-01"}]"#,
        )
        .unwrap();

        let mut app = App::new_for_test();
        app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(app.mode_label(), "Import");
        for c in path.to_string_lossy().chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert!(app.import_prompt.is_none());
        assert!(app.import_in_progress());

        for _ in 0..200 {
            app.tick();
            if !app.import_in_progress() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        assert!(!app.import_in_progress());
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.records()[0].title, "From disk");
    }

    #[test]
    fn test_recovered_storage_raises_alert() {
        let app = App::with_repository(MemoryRepository::with_raw("{broken"));
        assert!(app.store.is_empty());
        assert_eq!(app.alert_count(), 1);
        assert_eq!(app.alert().unwrap().title, "Storage recovered");
    }

    #[test]
    fn test_duplicate_stored_ids_raise_alert() {
        let app = App::with_repository(MemoryRepository::with_raw(
            r#"[{"id":"1","title":"A","start":"2024-01-01"},
                {"id":"1","title":"B","start":"2024-01-02"}]"#,
        ));
        assert!(app.store.is_empty());
        assert_eq!(app.alert_count(), 1);
        let alert = app.alert().unwrap();
        assert_eq!(alert.title, "Storage recovered");
        assert!(alert.lines[0].contains("duplicate id"), "{:?}", alert.lines);
    }

    #[test]
    fn test_external_delete_then_restart_is_empty() {
        let repo = MemoryRepository::new();
        let mut app = App::with_repository(repo.clone());
        add_titled(&mut app, "A", "2024-01-01");
        assert!(repo.raw().is_some());

        repo.clear();
        let app = App::with_repository(repo);
        assert!(app.store.is_empty());
        assert_eq!(app.alert_count(), 0);
    }

    #[test]
    fn test_notification_expires() {
        let mut app = App::new_for_test();
        app.handle_key(key(KeyCode::Char('e')));
        assert!(app.notification.is_some());

        for _ in 0..NOTIFICATION_TICKS {
            app.tick();
        }
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_help_overlay_closes_on_any_key() {
        let mut app = App::new_for_test();
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);
        app.handle_key(key(KeyCode::Char('a')));
        assert!(!app.show_help);
        assert!(app.panel.is_viewing());
    }
}
