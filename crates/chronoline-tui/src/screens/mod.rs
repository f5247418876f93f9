//! Screen definitions for the chronoline TUI.

pub mod main_screen;

pub use main_screen::MainScreen;

use crate::app::{Alert, App};
use crate::ui::widgets::TextInputState;
use crate::ui::{centered_fixed, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Trait for screens that can be rendered.
///
/// Rendering takes the app mutably because drawing the timeline records
/// what was drawn (hit boxes, acknowledged revision).
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer);
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let help_text = r"
  Timeline
    Left/Right or h/l   Previous/next event
    Home/End            First/last event
    [ / ]               Scroll back/forward
    + / -               Zoom in/out
    Click               Select an event

  Events
    a                   Add event
    e or Enter          Edit selected
    d                   Delete selected
    Esc                 Clear selection

  Files
    x                   Export to JSON
    i                   Import from JSON

    ?                   This help
    q                   Quit

  [Press any key to close]
";

    let width = 52.min(area.width.saturating_sub(4));
    let height = 25.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}

/// Render a blocking alert.
pub fn render_alert_overlay(alert: &Alert, area: Rect, buf: &mut Buffer) {
    let mut lines: Vec<Line> = vec![Line::default()];
    lines.extend(
        alert
            .lines
            .iter()
            .map(|line| Line::from(Span::styled(format!(" {line}"), Styles::default()))),
    );
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        " [Enter] OK",
        Styles::dim(),
    )));

    let width = 64.min(area.width.saturating_sub(4));
    let wanted = u16::try_from(alert.lines.len() + 5).unwrap_or(u16::MAX);
    let height = wanted.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(format!(" {} ", alert.title))
        .title_style(Styles::error())
        .borders(Borders::ALL)
        .border_style(Styles::error())
        .style(Styles::default());

    Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .render(overlay_area, buf);
}

/// Render the import path prompt.
pub fn render_import_prompt(input: &TextInputState, area: Rect, buf: &mut Buffer) {
    let width = 64.min(area.width.saturating_sub(4));
    let overlay_area = centered_fixed(width, 5, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Import events ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());
    let inner = block.inner(overlay_area);
    block.render(overlay_area, buf);

    if inner.height == 0 {
        return;
    }
    let input_area = Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(2), 1);
    input
        .widget()
        .focused(true)
        .placeholder("path to a JSON file")
        .render(input_area, buf);

    if inner.height >= 3 {
        Paragraph::new(Line::from(Span::styled(
            "Replaces all events. [Enter] Import  [Esc] Cancel",
            Styles::dim(),
        )))
        .render(
            Rect::new(inner.x + 1, inner.y + 2, inner.width.saturating_sub(2), 1),
            buf,
        );
    }
}
