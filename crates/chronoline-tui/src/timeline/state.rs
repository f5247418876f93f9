//! Timeline state management.
//!
//! Holds the items the view shows, the selection, the visible window and
//! the pending focus for a freshly added event. A focus request only takes
//! effect during a render pass whose item set contains the new item;
//! requests that never become satisfiable expire after a number of ticks.

use chrono::{Duration, Local, NaiveDate};
use chronoline_engine::{EventId, EventRecord, TimelineConfig};
use tracing::{debug, warn};

use super::item::{items_from_records, TimelineItem};
use super::layout::{place_items, Placement, Scale};

/// Columns scrolled per key press or mouse wheel tick.
pub const SCROLL_SPEED: i64 = 4;

/// Days per column for each zoom step, finest first.
pub const ZOOM_LEVELS: [u32; 7] = [1, 2, 7, 14, 30, 91, 365];

/// Columns left blank before the first item when the view first positions
/// itself.
const LEAD_COLUMNS: i64 = 2;

/// Screen cells occupied by one drawn item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitBox {
    pub id: EventId,
    pub x: u16,
    pub y: u16,
    pub width: u16,
}

impl HitBox {
    fn contains(&self, x: u16, y: u16) -> bool {
        y == self.y && x >= self.x && x < self.x.saturating_add(self.width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFocus {
    id: EventId,
    ticks_left: u32,
}

/// Timeline pane state.
#[derive(Debug)]
pub struct TimelineState {
    /// Items in chronological order.
    items: Vec<TimelineItem>,
    /// Bumped whenever `items` is replaced.
    revision: u64,
    /// Last item revision a render pass drew.
    rendered_revision: Option<u64>,
    selected: Option<EventId>,
    /// Date shown in the leftmost column.
    origin: NaiveDate,
    days_per_column: u32,
    item_margin: u16,
    focus_timeout_ticks: u32,
    /// Width of the drawing area seen by the last render.
    viewport: u16,
    /// Whether the window has been placed over the items yet.
    positioned: bool,
    hit_boxes: Vec<HitBox>,
    pending_focus: Option<PendingFocus>,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self::new(&TimelineConfig::default())
    }
}

impl TimelineState {
    /// Create an empty timeline.
    pub fn new(config: &TimelineConfig) -> Self {
        let today = Local::now().date_naive();
        Self {
            items: Vec::new(),
            revision: 0,
            rendered_revision: None,
            selected: None,
            origin: today,
            days_per_column: config.days_per_column.max(1),
            item_margin: config.item_margin,
            focus_timeout_ticks: config.focus_timeout_ticks,
            viewport: 0,
            positioned: false,
            hit_boxes: Vec::new(),
            pending_focus: None,
        }
    }

    /// Items in chronological order.
    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Revision of the current item set.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Revision drawn by the last render pass.
    pub fn rendered_revision(&self) -> Option<u64> {
        self.rendered_revision
    }

    pub fn selected(&self) -> Option<&EventId> {
        self.selected.as_ref()
    }

    /// Date in the leftmost column.
    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    pub fn days_per_column(&self) -> u32 {
        self.days_per_column
    }

    /// Current date-to-column mapping.
    pub fn scale(&self) -> Scale {
        Scale {
            origin: self.origin,
            days_per_column: self.days_per_column,
        }
    }

    /// Id still waiting to be focused, if any.
    pub fn pending_focus(&self) -> Option<&EventId> {
        self.pending_focus.as_ref().map(|p| &p.id)
    }

    /// Replace the displayed items with `records`.
    pub fn set_items(&mut self, records: &[EventRecord]) {
        self.items = items_from_records(records);
        self.revision += 1;
        self.hit_boxes.clear();

        if let Some(id) = &self.selected {
            if !self.contains(id) {
                self.selected = None;
            }
        }

        if !self.positioned {
            self.position_on_first();
        }

        debug!(
            revision = self.revision,
            count = self.items.len(),
            "Timeline items replaced"
        );
    }

    /// Place the window over the earliest item again, as on first load.
    ///
    /// Used when the whole item set was swapped out, e.g. by an import.
    pub fn reset_window(&mut self) {
        self.positioned = false;
        self.position_on_first();
    }

    /// Mirror a selection made elsewhere without moving the window.
    pub fn set_selected(&mut self, id: Option<EventId>) {
        self.selected = id.filter(|id| self.contains(id));
    }

    /// Select `id` and scroll it into view. Returns `false` if unknown.
    pub fn select(&mut self, id: &EventId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected = Some(id.clone());
        self.ensure_visible(id);
        true
    }

    /// Ask for `id` to be selected and centered by the next render pass
    /// whose items include it.
    ///
    /// A newer request replaces an older one.
    pub fn focus_when_rendered(&mut self, id: EventId) {
        debug!(%id, revision = self.revision, "Focus requested");
        self.pending_focus = Some(PendingFocus {
            id,
            ticks_left: self.focus_timeout_ticks,
        });
    }

    /// Advance the focus timeout by one tick.
    pub fn tick(&mut self) {
        let expired = match self.pending_focus.as_mut() {
            Some(pending) => {
                pending.ticks_left = pending.ticks_left.saturating_sub(1);
                pending.ticks_left == 0
            }
            None => false,
        };

        if expired {
            if let Some(pending) = self.pending_focus.take() {
                warn!(id = %pending.id, "Timeline never showed the new event, focus dropped");
            }
        }
    }

    /// Record that a render pass is drawing the current items into a
    /// `width` column area, and apply a pending focus once its item is part
    /// of the set being drawn.
    ///
    /// Returns the id that was focused.
    pub fn acknowledge_render(&mut self, width: u16) -> Option<EventId> {
        self.viewport = width;
        self.rendered_revision = Some(self.revision);

        let ready = self
            .pending_focus
            .as_ref()
            .is_some_and(|p| self.contains(&p.id));
        if !ready {
            return None;
        }

        let pending = self.pending_focus.take()?;
        self.selected = Some(pending.id.clone());
        if let Some(start) = self.item(&pending.id).map(|item| item.start) {
            self.center_on(start);
        }
        debug!(id = %pending.id, "Focused new event");
        Some(pending.id)
    }

    /// Lane placements for the current window.
    pub fn placements(&self) -> Vec<Placement> {
        place_items(&self.items, self.scale(), self.item_margin)
    }

    /// Replace the hit boxes after drawing.
    pub fn set_hit_boxes(&mut self, hit_boxes: Vec<HitBox>) {
        self.hit_boxes = hit_boxes;
    }

    /// The item drawn at screen cell (`x`, `y`).
    pub fn item_at(&self, x: u16, y: u16) -> Option<EventId> {
        self.hit_boxes
            .iter()
            .find(|hit| hit.contains(x, y))
            .map(|hit| hit.id.clone())
    }

    /// Move the selection to the next item. Stops at the last one.
    pub fn select_next(&mut self) -> Option<EventId> {
        let next = match self.selected_index() {
            Some(i) => (i + 1).min(self.items.len().saturating_sub(1)),
            None => 0,
        };
        self.select_index(next)
    }

    /// Move the selection to the previous item. Stops at the first one.
    pub fn select_prev(&mut self) -> Option<EventId> {
        let prev = match self.selected_index() {
            Some(i) => i.saturating_sub(1),
            None => self.items.len().saturating_sub(1),
        };
        self.select_index(prev)
    }

    /// Select the earliest item.
    pub fn select_first(&mut self) -> Option<EventId> {
        self.select_index(0)
    }

    /// Select the latest item.
    pub fn select_last(&mut self) -> Option<EventId> {
        self.select_index(self.items.len().saturating_sub(1))
    }

    /// Shift the window by `columns` (negative moves into the past).
    pub fn scroll(&mut self, columns: i64) {
        let days = columns.saturating_mul(i64::from(self.days_per_column));
        if let Some(origin) = self.origin.checked_add_signed(Duration::days(days)) {
            self.origin = origin;
        }
    }

    /// Show fewer days per column, keeping the center date in place.
    pub fn zoom_in(&mut self) {
        let level = ZOOM_LEVELS
            .iter()
            .rev()
            .find(|&&days| days < self.days_per_column)
            .copied();
        if let Some(days) = level {
            self.rescale(days);
        }
    }

    /// Show more days per column, keeping the center date in place.
    pub fn zoom_out(&mut self) {
        let level = ZOOM_LEVELS
            .iter()
            .find(|&&days| days > self.days_per_column)
            .copied();
        if let Some(days) = level {
            self.rescale(days);
        }
    }

    /// First and last dates visible in the last rendered width.
    pub fn visible_range(&self) -> (NaiveDate, NaiveDate) {
        let scale = self.scale();
        let last_column = i64::from(self.viewport.max(1)) - 1;
        let last = scale
            .date_at(last_column + 1)
            .pred_opt()
            .unwrap_or(self.origin);
        (self.origin, last)
    }

    fn position_on_first(&mut self) {
        if let Some(first) = self.items.first() {
            let lead = Duration::days(LEAD_COLUMNS * i64::from(self.days_per_column));
            self.origin = first.start.checked_sub_signed(lead).unwrap_or(first.start);
            self.positioned = true;
        }
    }

    fn contains(&self, id: &EventId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    fn item(&self, id: &EventId) -> Option<&TimelineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn selected_index(&self) -> Option<usize> {
        let id = self.selected.as_ref()?;
        self.items.iter().position(|item| &item.id == id)
    }

    fn select_index(&mut self, index: usize) -> Option<EventId> {
        let id = self.items.get(index)?.id.clone();
        self.selected = Some(id.clone());
        self.ensure_visible(&id);
        Some(id)
    }

    fn ensure_visible(&mut self, id: &EventId) {
        let Some(start) = self.item(id).map(|item| item.start) else {
            return;
        };
        let column = self.scale().column_of(start);
        if column < 0 || column >= i64::from(self.viewport) {
            self.center_on(start);
        }
    }

    /// Place `date` in the middle of the window.
    fn center_on(&mut self, date: NaiveDate) {
        let half = i64::from(self.viewport / 2) * i64::from(self.days_per_column);
        self.origin = date
            .checked_sub_signed(Duration::days(half))
            .unwrap_or(date);
    }

    fn rescale(&mut self, days_per_column: u32) {
        let center = self.scale().date_at(i64::from(self.viewport / 2));
        self.days_per_column = days_per_column;
        self.center_on(center);
        debug!(days_per_column, "Timeline zoom changed");
    }
}
