//! Application state for the TUI.

use std::time::Duration;

use crate::core::Clock;
use crate::detect::Classifier;
use crate::features::focus::{FocusTracker, Snapshot, TrackerEvent};
use crate::tui::event::Action;

/// Sensitivity change per key press.
const SENSITIVITY_STEP: f64 = 0.1;
/// Longest wait for a key before ticking again.
const MAX_POLL_MS: u64 = 100;

/// Application state.
pub struct App<C, K> {
    tracker: FocusTracker<C, K>,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<C: Classifier, K: Clock> App<C, K> {
    /// Create a new app instance around a tracker.
    pub const fn new(tracker: FocusTracker<C, K>) -> Self {
        Self {
            tracker,
            status: None,
            should_quit: false,
        }
    }

    /// Load models. A failure is shown in the pipeline status; the timer
    /// keeps working without detection.
    pub fn load(&mut self) {
        if self.tracker.load().is_err() {
            self.status = Some("Detection disabled; press q to quit".to_string());
        }
    }

    /// Run due ticks and surface what happened.
    pub fn tick(&mut self) {
        for event in self.tracker.advance() {
            self.status = Some(match event {
                TrackerEvent::StateChanged(t) => format!("{} -> {}", t.from, t.to),
                TrackerEvent::DetectionFailed(message) => message,
            });
        }
    }

    /// Apply a key action.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Start => self.start(),
            Action::Pause => {
                self.tracker.pause();
                self.status = Some("Paused".to_string());
            }
            Action::Reset => {
                self.tracker.reset();
                self.status = Some("Reset".to_string());
            }
            Action::SensitivityUp => self.nudge_sensitivity(SENSITIVITY_STEP),
            Action::SensitivityDown => self.nudge_sensitivity(-SENSITIVITY_STEP),
            Action::ThresholdUp => self.nudge_threshold(true),
            Action::ThresholdDown => self.nudge_threshold(false),
        }
    }

    /// Start or resume the timer.
    pub fn start(&mut self) {
        self.tracker.start();
        self.status = Some("Running".to_string());
    }

    fn nudge_sensitivity(&mut self, delta: f64) {
        let current = self.tracker.settings().sensitivity();
        self.tracker.set_sensitivity(current + delta);
        self.status = Some(format!(
            "Sensitivity {:.1}",
            self.tracker.settings().sensitivity()
        ));
    }

    fn nudge_threshold(&mut self, up: bool) {
        let current = self.tracker.settings().angle_threshold_degrees();
        let next = if up {
            current.saturating_add(1)
        } else {
            current.saturating_sub(1)
        };
        self.tracker.set_angle_threshold(next);
        self.status = Some(format!(
            "Threshold {}°",
            self.tracker.settings().angle_threshold_degrees()
        ));
    }

    /// How long to wait for input before the next deadline.
    pub fn poll_timeout(&self) -> Duration {
        let now = self.tracker.clock().now_ms();
        let wait = self
            .tracker
            .scheduler()
            .next_deadline()
            .map_or(MAX_POLL_MS, |due| due.saturating_sub(now).min(MAX_POLL_MS));
        Duration::from_millis(wait)
    }

    /// Current display outputs.
    pub fn snapshot(&self) -> Snapshot {
        self.tracker.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::core::{FaceLandmarks, ManualClock, Point};
    use crate::detect::{ReplayClassifier, Trace, TraceEntry, TraceFace};
    use crate::features::focus::{FocusState, PipelineStatus, TimerState};

    #[allow(clippy::cast_precision_loss)]
    fn focused_trace() -> Trace {
        Trace {
            cycle: true,
            frames: vec![TraceEntry {
                face: Some(TraceFace {
                    score: 0.8,
                    landmarks: Some(FaceLandmarks {
                        nose: (0..7).map(|i| Point::new(100.0, 10.0 * i as f64)).collect(),
                        left_eye: vec![Point::new(60.0, 0.0); 4],
                        right_eye: vec![Point::new(140.0, 0.0); 4],
                    }),
                    points: None,
                }),
                ..TraceEntry::default()
            }],
        }
    }

    fn app(trace: Trace) -> (App<ReplayClassifier, ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let tracker = FocusTracker::new(
            ReplayClassifier::from_trace(trace),
            clock.clone(),
            &TrackerConfig::default(),
        );
        let mut app = App::new(tracker);
        app.load();
        (app, clock)
    }

    #[test]
    fn test_start_and_tick() {
        let (mut app, clock) = app(focused_trace());
        app.apply(Action::Start);

        for _ in 0..10 {
            clock.advance(100);
            app.tick();
        }

        let snapshot = app.snapshot();
        assert_eq!(snapshot.timer, TimerState::Running);
        assert_eq!(snapshot.state, FocusState::Focused);
        assert_eq!(snapshot.elapsed_ms, 1_000);
        assert_eq!(app.status.as_deref(), Some("DISTRACTED -> FOCUSED"));
    }

    #[test]
    fn test_pause_and_reset() {
        let (mut app, clock) = app(focused_trace());
        app.start();
        clock.advance(600);
        app.tick();

        app.apply(Action::Pause);
        clock.advance(5_000);
        app.tick();
        assert_eq!(app.snapshot().elapsed_ms, 600);

        app.apply(Action::Reset);
        let snapshot = app.snapshot();
        assert_eq!(snapshot.elapsed_ms, 0);
        assert_eq!(snapshot.timer, TimerState::Stopped);
        assert_eq!(snapshot.state, FocusState::Distracted);
    }

    #[test]
    fn test_setting_keys_clamp() {
        let (mut app, _clock) = app(Trace::default());

        for _ in 0..10 {
            app.apply(Action::SensitivityUp);
        }
        assert!((app.snapshot().settings.sensitivity() - 0.9).abs() < 1e-9);
        assert_eq!(app.status.as_deref(), Some("Sensitivity 0.9"));

        for _ in 0..30 {
            app.apply(Action::ThresholdDown);
        }
        assert_eq!(app.snapshot().settings.angle_threshold_degrees(), 1);

        app.apply(Action::ThresholdUp);
        assert_eq!(app.snapshot().settings.angle_threshold_degrees(), 2);
    }

    #[test]
    fn test_load_failure_keeps_timer() {
        let clock = ManualClock::new(0);
        let tracker = FocusTracker::new(
            ReplayClassifier::from_path("/nonexistent/trace.yaml"),
            clock.clone(),
            &TrackerConfig::default(),
        );
        let mut app = App::new(tracker);
        app.load();
        assert!(matches!(app.snapshot().pipeline, PipelineStatus::Failed(_)));

        app.start();
        for _ in 0..10 {
            clock.advance(100);
            app.tick();
        }
        assert_eq!(app.snapshot().distracted_ms, 1_000);
        assert_eq!(app.snapshot().focused_ms, 0);
    }

    #[test]
    fn test_poll_timeout() {
        let (mut app, clock) = app(Trace::default());
        assert_eq!(app.poll_timeout(), Duration::from_millis(100));

        app.start();
        clock.advance(30);
        assert_eq!(app.poll_timeout(), Duration::from_millis(70));
    }

    #[test]
    fn test_quit() {
        let (mut app, _clock) = app(Trace::default());
        app.apply(Action::Quit);
        assert!(app.should_quit);
    }
}
