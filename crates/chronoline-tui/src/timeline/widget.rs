//! Timeline widget rendering.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use super::state::{HitBox, TimelineState};
use crate::ui::{Styles, Symbols};

/// Columns between axis ticks.
const TICK_SPACING: u16 = 12;

/// Widget for rendering the timeline pane.
///
/// Rendering acknowledges the drawn item revision on the state, which is
/// what lets a pending focus apply.
#[derive(Debug, Clone, Default)]
pub struct TimelineWidget {
    focused: bool,
}

impl TimelineWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the timeline has focus (affects border style).
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

fn axis_label(state: &TimelineState, column: i64) -> String {
    let date = state.scale().date_at(column);
    let format = match state.days_per_column() {
        0..=29 => "%b %-d",
        30..=364 => "%b %Y",
        _ => "%Y",
    };
    date.format(format).to_string()
}

fn scale_label(days_per_column: u32) -> String {
    match days_per_column {
        1 => " 1 day/col ".to_string(),
        days => format!(" {days} days/col "),
    }
}

impl StatefulWidget for TimelineWidget {
    type State = TimelineState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TimelineState) {
        let border_style = if self.focused {
            Styles::border_active()
        } else {
            Styles::border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Styles::default());
        let inner = block.inner(area);

        if inner.height == 0 || inner.width == 0 {
            block.render(area, buf);
            return;
        }

        state.acknowledge_render(inner.width);

        // Two rows go to the axis and its date labels.
        let lane_rows = inner.height.saturating_sub(2).max(1);
        let placements = state.placements();
        let hidden = placements
            .iter()
            .filter(|p| p.lane >= usize::from(lane_rows))
            .count();

        let mut title = vec![Span::styled(" Timeline ", Styles::title())];
        if hidden > 0 {
            title.push(Span::styled(
                format!("{} {hidden} hidden ", Symbols::MORE),
                Styles::warning(),
            ));
        }
        block
            .title(Line::from(title))
            .title(
                Line::from(Span::styled(
                    scale_label(state.days_per_column()),
                    Styles::dim(),
                ))
                .right_aligned(),
            )
            .render(area, buf);

        if state.is_empty() {
            state.set_hit_boxes(Vec::new());
            let message = Line::from(vec![
                Span::styled("No events yet", Styles::dim()),
                Span::styled("  (press a to add one)", Styles::dim()),
            ]);
            Paragraph::new(message).render(
                Rect::new(
                    inner.x + 1,
                    inner.y + inner.height / 2,
                    inner.width.saturating_sub(1),
                    1,
                ),
                buf,
            );
            return;
        }

        let width = i64::from(inner.width);
        let mut hit_boxes = Vec::new();
        for placement in &placements {
            let Ok(lane) = u16::try_from(placement.lane) else {
                continue;
            };
            if lane >= lane_rows {
                continue;
            }

            let first = placement.column.max(0);
            let last = (placement.column + placement.width).min(width);
            if first >= last {
                continue;
            }

            let skip = usize::try_from(first - placement.column).unwrap_or(0);
            let take = usize::try_from(last - first).unwrap_or(0);
            let visible: String = placement.text.chars().skip(skip).take(take).collect();

            let item = &state.items()[placement.index];
            let style = if state.selected() == Some(&item.id) {
                Styles::item_selected()
            } else {
                Styles::item()
            };

            let x = inner.x + u16::try_from(first).unwrap_or(0);
            let y = inner.y + lane;
            buf.set_stringn(x, y, &visible, take, style);
            hit_boxes.push(HitBox {
                id: item.id.clone(),
                x,
                y,
                width: u16::try_from(take).unwrap_or(u16::MAX),
            });
        }
        state.set_hit_boxes(hit_boxes);

        let axis_y = inner.y + lane_rows;
        if axis_y >= inner.y + inner.height {
            return;
        }
        for offset in 0..inner.width {
            let symbol = if offset % TICK_SPACING == 0 {
                Symbols::TICK
            } else {
                Symbols::AXIS
            };
            buf[(inner.x + offset, axis_y)]
                .set_symbol(symbol)
                .set_style(Styles::dim());
        }

        let label_y = axis_y + 1;
        if label_y >= inner.y + inner.height {
            return;
        }
        for offset in (0..inner.width).step_by(usize::from(TICK_SPACING)) {
            let label = axis_label(state, i64::from(offset));
            let room = usize::from(inner.width - offset);
            buf.set_stringn(inner.x + offset, label_y, &label, room, Styles::dim());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use chrono::NaiveDate;
    use chronoline_engine::{EventId, EventRecord};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn render(state: &mut TimelineState, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        TimelineWidget::new().render(area, &mut buf, state);
        buf
    }

    #[test]
    fn test_empty_timeline_message() {
        let mut state = TimelineState::default();
        let buf = render(&mut state, 60, 8);

        let text = buffer_to_string(&buf);
        assert!(text.contains("Timeline"));
        assert!(text.contains("No events yet"));
        assert_eq!(state.rendered_revision(), Some(0));
    }

    #[test]
    fn test_items_drawn_with_axis() {
        let mut state = TimelineState::default();
        let mut trip = EventRecord::new(EventId::new("2"), "Trip", date("2024-01-10"));
        trip.end = Some(date("2024-01-20"));
        state.set_items(&[
            EventRecord::new(EventId::new("1"), "Launch", date("2024-01-01")),
            trip,
        ]);

        let buf = render(&mut state, 60, 8);
        let text = buffer_to_string(&buf);

        assert!(text.contains("\u{25c6} Launch"));
        assert!(text.contains("[Trip"));
        assert!(text.contains("Dec 30"));
        assert!(text.contains("1 day/col"));
        assert_eq!(state.rendered_revision(), Some(1));
    }

    #[test]
    fn test_click_hits_drawn_item() {
        let mut state = TimelineState::default();
        state.set_items(&[EventRecord::new(
            EventId::new("1"),
            "Launch",
            date("2024-01-01"),
        )]);
        render(&mut state, 60, 8);

        // Border at x=0, two lead columns, so the item starts at x=3.
        assert_eq!(state.item_at(3, 1), Some(EventId::new("1")));
        assert_eq!(state.item_at(2, 1), None);
    }

    #[test]
    fn test_render_applies_pending_focus() {
        let mut state = TimelineState::default();
        state.set_items(&[EventRecord::new(
            EventId::new("1"),
            "Launch",
            date("2024-01-01"),
        )]);
        render(&mut state, 60, 8);

        state.set_items(&[
            EventRecord::new(EventId::new("1"), "Launch", date("2024-01-01")),
            EventRecord::new(EventId::new("2"), "Far away", date("2025-06-01")),
        ]);
        state.focus_when_rendered(EventId::new("2"));
        assert_eq!(state.selected(), None);

        let buf = render(&mut state, 60, 8);
        assert_eq!(state.selected(), Some(&EventId::new("2")));
        assert!(buffer_to_string(&buf).contains("Far away"));
    }

    #[test]
    fn test_hidden_lanes_reported_in_title() {
        let mut state = TimelineState::default();
        let records: Vec<_> = (0..5)
            .map(|i| EventRecord::new(EventId::new(i.to_string()), "Same day", date("2024-01-01")))
            .collect();
        state.set_items(&records);

        // Height 6 leaves two lanes after borders and axis.
        let buf = render(&mut state, 60, 6);
        assert!(buffer_to_string(&buf).contains("3 hidden"));
    }
}
