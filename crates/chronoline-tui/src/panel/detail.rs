//! Read-only view of the selected event.

use chronoline_engine::{display_date, EventRecord, Period};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::Styles;

/// Wrap description text to `width`, keeping its own line breaks.
pub fn wrap_description(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.lines().map(str::to_string).collect();
    }
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect()
}

/// Lines shown for `record` in a `width` column area.
fn detail_lines(record: &EventRecord, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(record.title.clone(), Styles::title()))];

    // A period line only when both ends exist; otherwise the single day.
    match Period::from_bounds(record.start, record.end) {
        Some(period) => lines.push(Line::from(Span::styled(period.to_string(), Styles::active()))),
        None => lines.push(Line::from(Span::styled(
            display_date(record.start),
            Styles::active(),
        ))),
    }

    if let Some(location) = &record.location {
        let place = if location.name.is_empty() {
            format!("{:.4}, {:.4}", location.lat, location.lng)
        } else {
            format!("{} ({:.4}, {:.4})", location.name, location.lat, location.lng)
        };
        lines.push(Line::from(vec![
            Span::styled("Location: ", Styles::dim()),
            Span::styled(place, Styles::default()),
        ]));
    }

    if let Some(image) = &record.image {
        lines.push(Line::from(vec![
            Span::styled("Image: ", Styles::dim()),
            Span::styled(image.clone(), Styles::default()),
        ]));
    }

    if !record.description.trim().is_empty() {
        lines.push(Line::default());
        lines.extend(
            wrap_description(&record.description, width)
                .into_iter()
                .map(|line| Line::from(Span::styled(line, Styles::default()))),
        );
    }

    lines
}

/// Widget rendering the selected event, or a hint when nothing is selected.
#[derive(Debug, Clone)]
pub struct DetailView<'a> {
    record: Option<&'a EventRecord>,
}

impl<'a> DetailView<'a> {
    pub fn new(record: Option<&'a EventRecord>) -> Self {
        Self { record }
    }
}

impl Widget for DetailView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .title(Span::styled(" Details ", Styles::title()))
            .style(Styles::default());
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = match self.record {
            Some(record) => {
                let mut lines = detail_lines(record, usize::from(inner.width.saturating_sub(2)));
                lines.push(Line::default());
                lines.push(Line::from(vec![
                    Span::styled(" e ", Styles::key_hint()),
                    Span::styled(" Edit  ", Styles::dim()),
                    Span::styled(" d ", Styles::key_hint()),
                    Span::styled(" Delete ", Styles::dim()),
                ]));
                lines
            }
            None => vec![Line::from(Span::styled(
                "Select an event on the timeline, or press a to add one.",
                Styles::dim(),
            ))],
        };

        let padded = Rect::new(
            inner.x.saturating_add(1),
            inner.y,
            inner.width.saturating_sub(2),
            inner.height,
        );
        Paragraph::new(lines).render(padded, buf);
    }
}
