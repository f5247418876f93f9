//! chronoline-tui: Terminal UI for the chronoline personal timeline
//!
//! This crate provides the TUI layer for chronoline, including:
//! - The timeline view with lanes, zoom and render-acknowledged focus
//! - The map view for the selected event's location
//! - The detail panel and add/edit form
//! - Import prompt, alerts and the event loop

mod app;
mod event;
pub mod map;
pub mod panel;
mod screens;
#[cfg(test)]
pub mod test_utils;
pub mod timeline;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{Alert, App};
pub use chronoline_engine;
pub use event::{Action, Event, EventHandler};

use chronoline_engine::Config;
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Frame, Terminal};
use std::io::stdout;
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Opens the event store described by `config`, sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let (store, report) = chronoline_engine::open_store(&config)?;
    info!(store = %store.location(), "Starting TUI");

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventHandler::new(config.tick_rate_ms);
    let mut app = App::new(config, store, report);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

/// Draw one frame of the app.
fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    screens::MainScreen.render(app, area, frame.buffer_mut());
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    // Windows reports releases too
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key);
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("Leaving TUI");
    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
