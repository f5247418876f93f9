//! Placement of timeline items on a horizontal time axis.
//!
//! Items are mapped to columns through a [`Scale`] and stacked into lanes
//! so that items on the same lane keep at least `margin` blank columns
//! between them.

use chrono::{Duration, NaiveDate};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::item::TimelineItem;
use crate::ui::Symbols;

/// Widest an item label may grow before it is truncated.
pub const MAX_LABEL_WIDTH: i64 = 24;

/// Maps dates to columns relative to the left edge of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    /// Date shown in column 0.
    pub origin: NaiveDate,
    pub days_per_column: u32,
}

impl Scale {
    /// Column of `date`; negative when left of the window.
    pub fn column_of(&self, date: NaiveDate) -> i64 {
        (date - self.origin)
            .num_days()
            .div_euclid(i64::from(self.days_per_column.max(1)))
    }

    /// First date falling into `column`.
    pub fn date_at(&self, column: i64) -> NaiveDate {
        let days = column.saturating_mul(i64::from(self.days_per_column.max(1)));
        self.origin
            .checked_add_signed(Duration::days(days))
            .unwrap_or(self.origin)
    }
}

/// Where one item ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Index into the item list.
    pub index: usize,
    pub lane: usize,
    /// First column, relative to the window.
    pub column: i64,
    /// Width in columns, label included.
    pub width: i64,
    /// Text drawn across `width` columns.
    pub text: String,
}

/// Place `items` (in chronological order) on lanes.
pub fn place_items(items: &[TimelineItem], scale: Scale, margin: u16) -> Vec<Placement> {
    let margin = i64::from(margin);
    let mut lane_ends: Vec<i64> = Vec::new();
    let mut placements = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let column = scale.column_of(item.start);
        let span = scale.column_of(item.end) - column + 1;
        let text = item_text(item, span);
        let width = i64::try_from(text.width()).unwrap_or(MAX_LABEL_WIDTH).max(span);

        let lane = match lane_ends.iter().position(|end| end + margin <= column) {
            Some(lane) => lane,
            None => {
                lane_ends.push(i64::MIN);
                lane_ends.len() - 1
            }
        };
        lane_ends[lane] = column + width;

        placements.push(Placement {
            index,
            lane,
            column,
            width,
            text: pad_to(text, width),
        });
    }

    placements
}

/// Render the text of an item: `◆ label` for a day, `[label   ]` for a range.
fn item_text(item: &TimelineItem, span: i64) -> String {
    if item.is_range() && span > 2 {
        let inner = (span - 2).clamp(1, MAX_LABEL_WIDTH.max(span - 2));
        format!(
            "{}{}{}",
            Symbols::RANGE_START,
            pad_to(fit_label(&item.label, inner), inner),
            Symbols::RANGE_END
        )
    } else {
        format!("{} {}", Symbols::POINT, fit_label(&item.label, MAX_LABEL_WIDTH - 2))
    }
}

/// Truncate `label` to `max` display columns, marking the cut.
pub fn fit_label(label: &str, max: i64) -> String {
    let max = usize::try_from(max).unwrap_or(0);
    if label.width() <= max {
        return label.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(Symbols::MORE);
    out
}

fn pad_to(mut text: String, width: i64) -> String {
    let width = usize::try_from(width).unwrap_or(0);
    let current = text.width();
    if current < width {
        text.push_str(&" ".repeat(width - current));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronoline_engine::EventId;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn item(id: &str, label: &str, start: &str, end: &str) -> TimelineItem {
        TimelineItem {
            id: EventId::new(id),
            label: label.into(),
            start: date(start),
            end: date(end),
        }
    }

    fn daily(origin: &str) -> Scale {
        Scale {
            origin: date(origin),
            days_per_column: 1,
        }
    }

    #[test]
    fn test_scale_columns() {
        let scale = Scale {
            origin: date("2024-01-01"),
            days_per_column: 7,
        };
        assert_eq!(scale.column_of(date("2024-01-01")), 0);
        assert_eq!(scale.column_of(date("2024-01-07")), 0);
        assert_eq!(scale.column_of(date("2024-01-08")), 1);
        assert_eq!(scale.column_of(date("2023-12-31")), -1);
        assert_eq!(scale.date_at(2), date("2024-01-15"));
    }

    #[test]
    fn test_point_item_text() {
        let items = [item("1", "Launch", "2024-01-03", "2024-01-03")];
        let placed = place_items(&items, daily("2024-01-01"), 1);

        assert_eq!(placed[0].column, 2);
        assert_eq!(placed[0].text, "\u{25c6} Launch");
        assert_eq!(placed[0].width, 8);
    }

    #[test]
    fn test_range_item_spans_its_days() {
        let items = [item("1", "Trip", "2024-01-01", "2024-01-10")];
        let placed = place_items(&items, daily("2024-01-01"), 1);

        assert_eq!(placed[0].width, 10);
        assert_eq!(placed[0].text, "[Trip    ]");
    }

    #[test]
    fn test_overlapping_items_stack_into_lanes() {
        let items = [
            item("1", "First", "2024-01-01", "2024-01-01"),
            item("2", "Second", "2024-01-03", "2024-01-03"),
            item("3", "Third", "2024-02-01", "2024-02-01"),
        ];
        let placed = place_items(&items, daily("2024-01-01"), 1);

        assert_eq!(placed[0].lane, 0);
        assert_eq!(placed[1].lane, 1);
        assert_eq!(placed[2].lane, 0);
    }

    #[test]
    fn test_margin_separates_items_on_a_lane() {
        // "◆ A" is 3 columns wide: columns 0..3.
        let items = [
            item("1", "A", "2024-01-01", "2024-01-01"),
            item("2", "B", "2024-01-04", "2024-01-04"),
        ];

        let tight = place_items(&items, daily("2024-01-01"), 0);
        assert_eq!(tight[1].lane, 0);

        let spaced = place_items(&items, daily("2024-01-01"), 1);
        assert_eq!(spaced[1].lane, 1);
    }

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("short", 10), "short");
        assert_eq!(fit_label("a long label here", 8), "a long \u{2026}");
        assert_eq!(fit_label("abc", 0), "");
    }
}
