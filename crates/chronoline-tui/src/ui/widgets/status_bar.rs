//! Status bar widget.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// A key hint for the status bar.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Status bar widget displayed at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: Vec<KeyHint>,
    right_text: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar.
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            hints: Vec::new(),
            right_text: None,
        }
    }

    /// Add key hints.
    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Set right-aligned text.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right_text = Some(text);
        self
    }
}

impl StatusBar<'_> {
    fn left_spans(&self) -> Vec<Span<'static>> {
        let mut spans = vec![
            Span::styled(format!(" {} ", self.mode), Styles::mode_badge()),
            Span::styled(" ", Styles::status_bar()),
        ];
        for hint in &self.hints {
            spans.push(Span::styled(format!(" {} ", hint.key), Styles::key_hint()));
            spans.push(Span::styled(format!(" {} ", hint.label), Styles::key_label()));
        }
        spans
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width == 0 {
            return;
        }
        let row = Rect::new(area.x, area.y, area.width, 1);
        buf.set_style(row, Styles::status_bar());

        // The right text wins; hints are cut short before it.
        let right_width = self
            .right_text
            .map_or(0, |text| u16::try_from(text.width()).unwrap_or(u16::MAX));
        let fits_right = right_width > 0 && right_width < area.width;
        let left_width = if fits_right {
            area.width - right_width - 1
        } else {
            area.width
        };

        buf.set_line(area.x, area.y, &Line::from(self.left_spans()), left_width);

        if let (true, Some(text)) = (fits_right, self.right_text) {
            let x = area.x + area.width - right_width;
            buf.set_string(x, area.y, text, Styles::status_bar());
        }
    }
}
