//! Timeline items: the view's copy of the records it displays.

use chrono::NaiveDate;
use chronoline_engine::{EventId, EventRecord};

/// One event as the timeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineItem {
    pub id: EventId,
    pub label: String,
    pub start: NaiveDate,
    /// Last covered day; equal to `start` for single-day events.
    pub end: NaiveDate,
}

impl TimelineItem {
    pub fn from_record(record: &EventRecord) -> Self {
        Self {
            id: record.id.clone(),
            label: record.title.clone(),
            start: record.start,
            end: record.last_day(),
        }
    }

    /// Whether the item covers more than one day.
    pub fn is_range(&self) -> bool {
        self.end > self.start
    }
}

/// Build items from records in chronological order.
pub fn items_from_records(records: &[EventRecord]) -> Vec<TimelineItem> {
    let mut items: Vec<TimelineItem> = records.iter().map(TimelineItem::from_record).collect();
    items.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.end.cmp(&b.end))
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.id.cmp(&b.id))
    });
    items
}
