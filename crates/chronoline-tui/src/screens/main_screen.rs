//! The main screen: timeline on top, detail panel and map below.

use crate::app::App;
use crate::map::MapView;
use crate::panel::{DetailView, PanelMode};
use crate::screens::{render_alert_overlay, render_help_overlay, render_import_prompt, Screen};
use crate::timeline::TimelineWidget;
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::ui::{detail_map_layout, main_layout, timeline_layout};
use ratatui::{buffer::Buffer, layout::Rect, widgets::StatefulWidget, widgets::Widget};

/// The main screen.
pub struct MainScreen;

impl Screen for MainScreen {
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        let (timeline_area, panel_area) = timeline_layout(main_area);

        TimelineWidget::new()
            .focused(app.panel.is_viewing())
            .render(timeline_area, buf, &mut app.timeline);

        match &app.panel {
            PanelMode::Viewing => {
                let record = app.store.selected_record();
                match record.and_then(|r| r.location.as_ref()) {
                    Some(location) => {
                        let (detail_area, map_area) = detail_map_layout(panel_area);
                        DetailView::new(record).render(detail_area, buf);
                        MapView::new(Some(location))
                            .zoom(app.config.map.zoom)
                            .render(map_area, buf);
                    }
                    None => DetailView::new(record).render(panel_area, buf),
                }
            }
            PanelMode::Editing(form) | PanelMode::Adding(form) => {
                form.widget().render(panel_area, buf);
            }
        }

        render_status_bar(app, status_area, buf);

        if let Some(prompt) = &app.import_prompt {
            render_import_prompt(prompt, area, buf);
        }
        if app.show_help {
            render_help_overlay(area, buf);
        }
        if let Some(alert) = app.alert() {
            render_alert_overlay(alert, area, buf);
        }
    }
}

fn render_status_bar(app: &App, area: Rect, buf: &mut Buffer) {
    let hints = if app.alert().is_some() {
        vec![KeyHint::new("Enter", "Dismiss")]
    } else if app.import_prompt.is_some() {
        vec![KeyHint::new("Enter", "Import"), KeyHint::new("Esc", "Cancel")]
    } else if app.panel.is_viewing() {
        let mut hints = vec![KeyHint::new("a", "Add")];
        if app.store.selected().is_some() {
            hints.push(KeyHint::new("e", "Edit"));
            hints.push(KeyHint::new("d", "Delete"));
        }
        hints.extend([
            KeyHint::new("x", "Export"),
            KeyHint::new("i", "Import"),
            KeyHint::new("?", "Help"),
            KeyHint::new("q", "Quit"),
        ]);
        hints
    } else {
        vec![
            KeyHint::new("Tab", "Next"),
            KeyHint::new("Ctrl+S", "Save"),
            KeyHint::new("Esc", "Cancel"),
        ]
    };

    let count = match app.store.len() {
        1 => "1 event".to_string(),
        n => format!("{n} events"),
    };
    let right = app.notification.as_deref().unwrap_or(&count);

    StatusBar::new(app.mode_label())
        .hints(hints)
        .right(right)
        .render(area, buf);
}
