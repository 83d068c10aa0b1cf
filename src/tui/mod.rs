//! Terminal User Interface (TUI) for the live focus timer.
//!
//! Built with ratatui and crossterm. The event loop drives the tracker:
//! every pass runs the ticks that are due, redraws, then waits for a key
//! until the next deadline.

mod app;
mod event;
mod ui;

pub use app::App;

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::config::TrackerConfig;
use crate::core::{Clock, SystemClock};
use crate::detect::Classifier;
use crate::error::FocusError;
use crate::features::focus::FocusTracker;

/// Run the live timer until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal fails to initialize or draw.
pub fn run<C: Classifier>(
    classifier: C,
    config: &TrackerConfig,
    autostart: bool,
) -> Result<(), FocusError> {
    let tracker = FocusTracker::new(classifier, SystemClock::new(), config);
    let mut app = App::new(tracker);
    app.load();
    if autostart {
        app.start();
    }

    // Setup terminal
    enable_raw_mode().map_err(|e| FocusError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| FocusError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| FocusError::Terminal(format!("Failed to create terminal: {e}")))?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend, C: Classifier, K: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<C, K>,
) -> Result<(), FocusError> {
    while !app.should_quit {
        app.tick();

        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| FocusError::Terminal(format!("Failed to draw: {e}")))?;

        if let Some(action) = event::handle_events(app.poll_timeout())? {
            app.apply(action);
        }
    }

    Ok(())
}
