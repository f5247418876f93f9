//! Timeline module for displaying events along a horizontal date axis.
//!
//! This module provides:
//! - [`TimelineItem`] - The view's copy of one event
//! - [`TimelineState`] - Selection, window, zoom and pending focus
//! - [`TimelineWidget`] - Widget for rendering the timeline pane

mod item;
mod layout;
mod state;
mod widget;

pub use item::{items_from_records, TimelineItem};
pub use layout::{fit_label, place_items, Placement, Scale, MAX_LABEL_WIDTH};
pub use state::{HitBox, TimelineState, SCROLL_SPEED, ZOOM_LEVELS};
pub use widget::TimelineWidget;
