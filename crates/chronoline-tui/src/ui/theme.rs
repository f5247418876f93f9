//! Colors, glyphs and styles for the chronoline TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette: dark slate background with an amber accent.
pub struct Palette;

impl Palette {
    pub const BG: Color = Color::Rgb(24, 27, 33);
    pub const FG: Color = Color::Rgb(226, 222, 212);
    pub const DIM: Color = Color::Rgb(128, 132, 140);

    pub const ACCENT: Color = Color::Rgb(236, 178, 84);
    pub const ACCENT_DIM: Color = Color::Rgb(120, 142, 168);

    pub const STATUS_BG: Color = Color::Rgb(38, 42, 50);
    pub const STATUS_KEY_BG: Color = Color::Rgb(84, 96, 116);

    pub const WARNING: Color = Color::Rgb(236, 200, 96);
    pub const ERROR: Color = Color::Rgb(230, 96, 88);

    pub const BORDER: Color = Color::Rgb(70, 76, 88);
    pub const BORDER_ACTIVE: Color = Self::ACCENT;

    pub const COASTLINE: Color = Color::Rgb(86, 128, 104);
    pub const MARKER: Color = Color::Rgb(240, 104, 84);
}

/// Glyphs used by the timeline and map.
pub struct Symbols;

impl Symbols {
    pub const POINT: &'static str = "\u{25c6}"; // ◆
    pub const RANGE_START: &'static str = "[";
    pub const RANGE_END: &'static str = "]";
    pub const MARKER: &'static str = "\u{25c9}"; // ◉
    pub const TICK: &'static str = "\u{252c}"; // ┬
    pub const AXIS: &'static str = "\u{2500}"; // ─
    pub const MORE: &'static str = "\u{2026}"; // …
}

/// Named styles for every element the TUI draws.
pub struct Styles;

impl Styles {
    const fn on_bg(fg: Color) -> Style {
        Style::new().fg(fg).bg(Palette::BG)
    }

    /// Body text.
    pub const fn default() -> Style {
        Self::on_bg(Palette::FG)
    }

    /// Labels, hints and other secondary text.
    pub const fn dim() -> Style {
        Self::on_bg(Palette::DIM)
    }

    /// Event titles and other emphasized text.
    pub const fn highlight() -> Style {
        Self::on_bg(Palette::ACCENT).add_modifier(Modifier::BOLD)
    }

    /// The focused form field.
    pub const fn active() -> Style {
        Self::on_bg(Palette::ACCENT)
    }

    pub const fn warning() -> Style {
        Self::on_bg(Palette::WARNING)
    }

    pub const fn error() -> Style {
        Self::on_bg(Palette::ERROR)
    }

    /// Block titles.
    pub const fn title() -> Style {
        Style::new().fg(Palette::ACCENT).add_modifier(Modifier::BOLD)
    }

    /// A timeline item that is not selected.
    pub const fn item() -> Style {
        Style::new().fg(Palette::BG).bg(Palette::ACCENT_DIM)
    }

    /// The selected timeline item.
    pub const fn item_selected() -> Style {
        Style::new()
            .fg(Palette::BG)
            .bg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Map marker and its label.
    pub const fn marker() -> Style {
        Style::new().fg(Palette::MARKER).add_modifier(Modifier::BOLD)
    }

    /// Key of a status bar hint.
    pub const fn key_hint() -> Style {
        Style::new()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Label of a status bar hint.
    pub const fn key_label() -> Style {
        Self::status_bar()
    }

    pub const fn status_bar() -> Style {
        Style::new().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// The mode badge at the left of the status bar.
    pub const fn mode_badge() -> Style {
        Style::new()
            .fg(Palette::BG)
            .bg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub const fn border() -> Style {
        Style::new().fg(Palette::BORDER)
    }

    pub const fn border_active() -> Style {
        Style::new().fg(Palette::BORDER_ACTIVE)
    }
}
