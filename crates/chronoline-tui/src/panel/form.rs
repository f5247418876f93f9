//! Add/edit form.

use chrono::NaiveDate;
use chronoline_engine::{DraftError, EventDraft, EventFields, EventId, EventRecord, DATE_FORMAT};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::{Styles, TextInputState};

/// Width of the label column.
const LABEL_WIDTH: u16 = 14;

/// Inputs of the form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Start,
    End,
    Description,
    Image,
    LocationName,
    Latitude,
    Longitude,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Title,
        FormField::Start,
        FormField::End,
        FormField::Description,
        FormField::Image,
        FormField::LocationName,
        FormField::Latitude,
        FormField::Longitude,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Start => "Start",
            FormField::End => "End",
            FormField::Description => "Description",
            FormField::Image => "Image",
            FormField::LocationName => "Location",
            FormField::Latitude => "Latitude",
            FormField::Longitude => "Longitude",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            FormField::Start => "YYYY-MM-DD",
            FormField::End => "YYYY-MM-DD (optional)",
            FormField::Image => "path or URL (optional)",
            FormField::LocationName => "place name (optional)",
            FormField::Latitude => "-90 to 90",
            FormField::Longitude => "-180 to 180",
            FormField::Title | FormField::Description => "",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Whether the form creates a record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(EventId),
}

/// Result of feeding a key to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Continue,
    Submit,
    Cancel,
}

/// State of the add/edit form.
#[derive(Debug, Clone)]
pub struct EventForm {
    mode: FormMode,
    inputs: [TextInputState; 8],
    focus: FormField,
    error: Option<String>,
}

impl EventForm {
    /// An empty form for a new event, starting today.
    pub fn add(today: NaiveDate) -> Self {
        let mut form = Self {
            mode: FormMode::Add,
            inputs: Default::default(),
            focus: FormField::Title,
            error: None,
        };
        form.set(FormField::Start, today.format(DATE_FORMAT).to_string());
        form
    }

    /// A form pre-filled from `record`.
    pub fn edit(record: &EventRecord) -> Self {
        let fields = EventFields::from_record(record);
        let mut form = Self {
            mode: FormMode::Edit(record.id.clone()),
            inputs: Default::default(),
            focus: FormField::Title,
            error: None,
        };
        form.set(FormField::Title, fields.title);
        form.set(FormField::Start, fields.start);
        form.set(FormField::End, fields.end);
        form.set(FormField::Description, fields.description);
        form.set(FormField::Image, fields.image);
        form.set(FormField::LocationName, fields.location_name);
        form.set(FormField::Latitude, fields.lat);
        form.set(FormField::Longitude, fields.lng);
        form
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// Current text of `field`.
    pub fn value(&self, field: FormField) -> &str {
        self.inputs[field.index()].content()
    }

    /// Replace the text of `field`.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.inputs[field.index()] = TextInputState::with_content(value);
    }

    /// Raw text of all inputs.
    pub fn fields(&self) -> EventFields {
        EventFields {
            title: self.value(FormField::Title).to_string(),
            start: self.value(FormField::Start).to_string(),
            end: self.value(FormField::End).to_string(),
            description: self.value(FormField::Description).to_string(),
            image: self.value(FormField::Image).to_string(),
            location_name: self.value(FormField::LocationName).to_string(),
            lat: self.value(FormField::Latitude).to_string(),
            lng: self.value(FormField::Longitude).to_string(),
        }
    }

    /// Parse the inputs into a draft.
    pub fn parse(&self) -> Result<EventDraft, DraftError> {
        EventDraft::parse(&self.fields())
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return FormOutcome::Submit;
        }

        match key.code {
            KeyCode::Esc => FormOutcome::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                FormOutcome::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                FormOutcome::Continue
            }
            KeyCode::Enter => {
                if self.focus == FormField::Longitude {
                    FormOutcome::Submit
                } else {
                    self.focus_next();
                    FormOutcome::Continue
                }
            }
            _ => {
                if self.inputs[self.focus.index()].handle_key(key) {
                    self.error = None;
                }
                FormOutcome::Continue
            }
        }
    }

    fn focus_next(&mut self) {
        let next = (self.focus.index() + 1) % FormField::ALL.len();
        self.focus = FormField::ALL[next];
    }

    fn focus_prev(&mut self) {
        let len = FormField::ALL.len();
        let prev = (self.focus.index() + len - 1) % len;
        self.focus = FormField::ALL[prev];
    }

    /// Widget for this form.
    pub fn widget(&self) -> EventFormView<'_> {
        EventFormView { form: self }
    }
}

/// Renders an [`EventForm`].
#[derive(Debug, Clone)]
pub struct EventFormView<'a> {
    form: &'a EventForm,
}

impl Widget for EventFormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.form.mode {
            FormMode::Add => " New event ",
            FormMode::Edit(_) => " Edit event ",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .title(Span::styled(title, Styles::title()))
            .style(Styles::default());
        let inner = block.inner(area);
        block.render(area, buf);

        let bottom = inner.y.saturating_add(inner.height);
        let mut y = inner.y;
        for field in FormField::ALL {
            if y >= bottom {
                return;
            }
            let focused = self.form.focus == field;
            let label_style = if focused {
                Styles::highlight()
            } else {
                Styles::dim()
            };
            buf.set_stringn(
                inner.x + 1,
                y,
                field.label(),
                usize::from(LABEL_WIDTH),
                label_style,
            );

            let input_x = inner.x + 1 + LABEL_WIDTH;
            let input_width = inner.width.saturating_sub(LABEL_WIDTH + 2);
            self.form.inputs[field.index()]
                .widget()
                .focused(focused)
                .placeholder(field.placeholder())
                .render(Rect::new(input_x, y, input_width, 1), buf);
            y += 1;
        }

        y += 1;
        if y < bottom {
            if let Some(error) = &self.form.error {
                Paragraph::new(Line::from(Span::styled(error.clone(), Styles::error())))
                    .render(Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1), buf);
                y += 1;
            }
        }
        if y < bottom {
            let hints = Line::from(vec![
                Span::styled(" Tab ", Styles::key_hint()),
                Span::styled(" Next  ", Styles::dim()),
                Span::styled(" Ctrl+S ", Styles::key_hint()),
                Span::styled(" Save  ", Styles::dim()),
                Span::styled(" Esc ", Styles::key_hint()),
                Span::styled(" Cancel ", Styles::dim()),
            ]);
            Paragraph::new(hints)
                .render(Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use chronoline_engine::Location;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut EventForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_add_form_prefills_start() {
        let form = EventForm::add(today());
        assert_eq!(form.mode(), &FormMode::Add);
        assert_eq!(form.value(FormField::Start), "2024-01-01");
        assert_eq!(form.focus(), FormField::Title);
    }

    #[test]
    fn test_edit_form_flattens_location() {
        let mut record = EventRecord::new(EventId::new("7"), "Trip", today());
        record.location = Some(Location::new("Oslo", 59.9, 10.75));

        let form = EventForm::edit(&record);
        assert_eq!(form.mode(), &FormMode::Edit(EventId::new("7")));
        assert_eq!(form.value(FormField::Title), "Trip");
        assert_eq!(form.value(FormField::LocationName), "Oslo");
        assert_eq!(form.value(FormField::Latitude), "59.9");
        assert_eq!(form.value(FormField::Longitude), "10.75");
    }

    #[test]
    fn test_typing_and_navigation() {
        let mut form = EventForm::add(today());
        type_text(&mut form, "Launch");
        assert_eq!(form.value(FormField::Title), "Launch");

        assert_eq!(form.handle_key(key(KeyCode::Tab)), FormOutcome::Continue);
        assert_eq!(form.focus(), FormField::Start);
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focus(), FormField::Title);
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.focus(), FormField::Longitude);
    }

    #[test]
    fn test_enter_submits_on_last_field() {
        let mut form = EventForm::add(today());
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Continue);
        assert_eq!(form.focus(), FormField::Start);

        for _ in 0..6 {
            form.handle_key(key(KeyCode::Enter));
        }
        assert_eq!(form.focus(), FormField::Longitude);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Submit);
    }

    #[test]
    fn test_ctrl_s_submits_and_esc_cancels() {
        let mut form = EventForm::add(today());
        let save = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(form.handle_key(save), FormOutcome::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormOutcome::Cancel);
    }

    #[test]
    fn test_parse_reports_bad_coordinate() {
        let mut form = EventForm::add(today());
        form.set(FormField::Title, "Launch");
        form.set(FormField::Latitude, "north");

        assert!(matches!(
            form.parse(),
            Err(DraftError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_typing_clears_error() {
        let mut form = EventForm::add(today());
        form.set_error("Title is required");
        type_text(&mut form, "x");
        assert_eq!(form.error(), None);
    }

    #[test]
    fn test_render_form() {
        let mut form = EventForm::add(today());
        form.set_error("Title is required");

        let area = Rect::new(0, 0, 60, 14);
        let mut buf = Buffer::empty(area);
        form.widget().render(area, &mut buf);
        let text = buffer_to_string(&buf);

        assert!(text.contains("New event"));
        assert!(text.contains("Start         2024-01-01"));
        assert!(text.contains("Longitude"));
        assert!(text.contains("Title is required"));
        assert!(text.contains("Ctrl+S"));
    }
}
