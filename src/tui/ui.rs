//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::core::Clock;
use crate::detect::Classifier;
use crate::features::focus::{FocusState, PipelineStatus, Snapshot, TimerState};
use crate::tui::app::App;

const HELP: &str = "s:start | p:pause | r:reset | +/-:sensitivity | ]/[:threshold | q:quit";

/// Render the application UI.
pub fn render<C: Classifier, K: Clock>(frame: &mut Frame<'_>, app: &App<C, K>) {
    let snapshot = app.snapshot();

    // Create layout: header, timer, focus gauge, settings, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Timer
            Constraint::Length(3), // Focus gauge
            Constraint::Length(3), // Settings
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, &snapshot, chunks[0]);
    render_timer(frame, &snapshot, chunks[1]);
    render_gauge(frame, &snapshot, chunks[2]);
    render_settings(frame, &snapshot, chunks[3]);
    render_status_bar(frame, app.status.as_deref(), chunks[4]);
}

const fn state_color(state: FocusState) -> Color {
    match state {
        FocusState::Focused => Color::Green,
        FocusState::Distracted => Color::Red,
    }
}

/// Render the pipeline status.
fn render_header(frame: &mut Frame<'_>, snapshot: &Snapshot, area: Rect) {
    let color = match snapshot.pipeline {
        PipelineStatus::Loading => Color::Yellow,
        PipelineStatus::Ready => Color::Cyan,
        PipelineStatus::Failed(_) => Color::Red,
    };

    let header = Paragraph::new(format!(" {} ", snapshot.pipeline.label()))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(" studyfocus ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

/// Render elapsed time, the state label and the two accumulators.
fn render_timer(frame: &mut Frame<'_>, snapshot: &Snapshot, area: Rect) {
    let timer_style = match snapshot.timer {
        TimerState::Running => Style::default().add_modifier(Modifier::BOLD),
        TimerState::Paused | TimerState::Stopped => Style::default().fg(Color::DarkGray),
    };

    let lines = vec![
        Line::from(Span::styled(snapshot.elapsed(), timer_style)),
        Line::from(Span::styled(
            snapshot.state.label(),
            Style::default()
                .fg(state_color(snapshot.state))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Focused ", Style::default().fg(Color::DarkGray)),
            Span::styled(snapshot.focused(), Style::default().fg(Color::Green)),
            Span::raw("   "),
            Span::styled("Distracted ", Style::default().fg(Color::DarkGray)),
            Span::styled(snapshot.distracted(), Style::default().fg(Color::Red)),
        ]),
    ];

    let timer = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(format!(" {} ", snapshot.timer))
                .borders(Borders::ALL),
        );

    frame.render_widget(timer, area);
}

/// Render the share of time spent focused.
fn render_gauge(frame: &mut Frame<'_>, snapshot: &Snapshot, area: Rect) {
    let gauge = Gauge::default()
        .block(Block::default().title(" Focus ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Red))
        .ratio(snapshot.focus_ratio().clamp(0.0, 1.0));

    frame.render_widget(gauge, area);
}

/// Render the live-adjustable settings and the last angle.
fn render_settings(frame: &mut Frame<'_>, snapshot: &Snapshot, area: Rect) {
    let angle = snapshot
        .last_angle
        .map_or_else(|| "--".to_string(), |a| format!("{a:.1}°"));

    let text = format!(
        " Sensitivity {:.1}   Threshold {}°   Angle {}   Frames {}",
        snapshot.settings.sensitivity(),
        snapshot.settings.angle_threshold_degrees(),
        angle,
        snapshot.stats.frames
    );

    let settings = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(settings, area);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, status: Option<&str>, area: Rect) {
    let status = Paragraph::new(status.unwrap_or(HELP)).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::core::ManualClock;
    use crate::detect::{ReplayClassifier, Trace};
    use crate::features::focus::FocusTracker;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_render_initial_screen() {
        let tracker = FocusTracker::new(
            ReplayClassifier::from_trace(Trace::default()),
            ManualClock::new(0),
            &TrackerConfig::default(),
        );
        let mut app = App::new(tracker);
        app.load();

        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("READY - FACE THE CAMERA"));
        assert!(text.contains("DISTRACTED"));
        assert!(text.contains("00:00"));
        assert!(text.contains("s:start"));
    }
}
