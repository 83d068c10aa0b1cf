//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::FocusError;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start or resume the timer.
    Start,
    /// Pause the timer.
    Pause,
    /// Zero the session.
    Reset,
    SensitivityUp,
    SensitivityDown,
    ThresholdUp,
    ThresholdDown,
}

/// Map a key press to an action.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('s' | ' ') => Some(Action::Start),
        KeyCode::Char('p') => Some(Action::Pause),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('+' | '=') => Some(Action::SensitivityUp),
        KeyCode::Char('-') => Some(Action::SensitivityDown),
        KeyCode::Char(']') | KeyCode::Right => Some(Action::ThresholdUp),
        KeyCode::Char('[') | KeyCode::Left => Some(Action::ThresholdDown),
        _ => None,
    }
}

/// Wait up to `timeout` for a key press.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(timeout: Duration) -> Result<Option<Action>, FocusError> {
    if !event::poll(timeout)
        .map_err(|e| FocusError::Terminal(format!("Event poll failed: {e}")))?
    {
        return Ok(None);
    }

    match event::read().map_err(|e| FocusError::Terminal(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(action_for(key)),
        _ => Ok(None),
    }
}
