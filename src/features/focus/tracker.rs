//! The focus tracker session.
//!
//! `FocusTracker` owns everything one study session needs: the classifier,
//! the clock, the state machine, the session clock and the scheduler. The
//! control surface (start, pause, reset and the two setters) and the display
//! projection are methods on it. Call [`FocusTracker::advance`] from the event
//! loop to run whatever ticks are due.

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::core::{estimate_angle, Clock};
use crate::detect::{Classifier, DetectError, DetectOptions, Frame};
use crate::features::focus::scheduler::{Scheduler, Task};
use crate::features::focus::state::{FocusState, FocusStateMachine, Observation, Transition};
use crate::features::focus::timer::{format_time, SessionClock, TimerState};

/// Lowest accepted sensitivity.
pub const MIN_SENSITIVITY: f64 = 0.1;
/// Highest accepted sensitivity.
pub const MAX_SENSITIVITY: f64 = 0.9;

/// Settings read by every detection tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackerSettings {
    sensitivity: f64,
    angle_threshold_degrees: u32,
}

impl TrackerSettings {
    #[must_use]
    pub fn new(sensitivity: f64, angle_threshold_degrees: u32) -> Self {
        let mut settings = Self {
            sensitivity: 0.5,
            angle_threshold_degrees: 1,
        };
        settings.set_sensitivity(sensitivity);
        settings.set_angle_threshold(angle_threshold_degrees);
        settings
    }

    #[must_use]
    pub const fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    #[must_use]
    pub const fn angle_threshold_degrees(&self) -> u32 {
        self.angle_threshold_degrees
    }

    /// Set the detector score threshold, clamped into range. NaN is ignored.
    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        if !sensitivity.is_nan() {
            self.sensitivity = sensitivity.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
        }
    }

    /// Set the focus angle threshold. Zero is raised to 1 degree.
    pub fn set_angle_threshold(&mut self, degrees: u32) {
        self.angle_threshold_degrees = degrees.max(1);
    }
}

/// State of the model pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum PipelineStatus {
    /// Models not loaded yet; detection ticks are skipped.
    Loading,
    /// Detection is running.
    Ready,
    /// Loading failed. Detection stays halted for the session.
    Failed(String),
}

impl PipelineStatus {
    /// User-facing status line.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Loading => "LOADING MODELS...".to_string(),
            Self::Ready => "READY - FACE THE CAMERA".to_string(),
            Self::Failed(message) => format!("MODEL ERROR: {message}"),
        }
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Something worth telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// The focus state changed.
    StateChanged(Transition),
    /// A detection tick failed and counted as no face.
    DetectionFailed(String),
}

/// Per-session detection counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DetectionStats {
    /// Detection ticks that called the classifier.
    pub frames: u64,
    /// Ticks that found a face.
    pub faces: u64,
    /// Ticks whose classifier call failed.
    pub failures: u64,
    /// Faces whose angle could not be estimated.
    pub unknown_angles: u64,
}

/// Display projection of a tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub elapsed_ms: u64,
    pub focused_ms: u64,
    pub distracted_ms: u64,
    pub state: FocusState,
    pub timer: TimerState,
    pub pipeline: PipelineStatus,
    pub last_angle: Option<f64>,
    pub settings: TrackerSettings,
    pub stats: DetectionStats,
}

impl Snapshot {
    #[must_use]
    pub fn elapsed(&self) -> String {
        format_time(self.elapsed_ms)
    }

    #[must_use]
    pub fn focused(&self) -> String {
        format_time(self.focused_ms)
    }

    #[must_use]
    pub fn distracted(&self) -> String {
        format_time(self.distracted_ms)
    }

    /// Share of sampled time spent focused (0.0 - 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn focus_ratio(&self) -> f64 {
        let total = self.focused_ms + self.distracted_ms;
        if total == 0 {
            0.0
        } else {
            self.focused_ms as f64 / total as f64
        }
    }
}

/// A focus tracking session.
pub struct FocusTracker<C, K> {
    classifier: C,
    clock: K,
    settings: TrackerSettings,
    machine: FocusStateMachine,
    timer: SessionClock,
    scheduler: Scheduler,
    pipeline: PipelineStatus,
    last_angle: Option<f64>,
    stats: DetectionStats,
}

impl<C: Classifier, K: Clock> FocusTracker<C, K> {
    /// Create a stopped tracker. Models are not loaded yet.
    #[must_use]
    pub fn new(classifier: C, clock: K, config: &TrackerConfig) -> Self {
        Self {
            classifier,
            clock,
            settings: TrackerSettings::new(config.sensitivity, config.angle_threshold_degrees),
            machine: FocusStateMachine::new(config.grace_period_ms),
            timer: SessionClock::new(config.display_interval_ms.max(1)),
            scheduler: Scheduler::new(config.display_interval_ms, config.detection_interval_ms),
            pipeline: PipelineStatus::Loading,
            last_angle: None,
            stats: DetectionStats::default(),
        }
    }

    /// Load the classifier's models.
    ///
    /// On failure the pipeline is marked failed for the rest of the session;
    /// there is no retry. The timer keeps working without detection.
    ///
    /// # Errors
    ///
    /// Returns the classifier's load error.
    pub fn load(&mut self) -> Result<(), DetectError> {
        if self.pipeline.is_ready() {
            return Ok(());
        }
        if let PipelineStatus::Failed(ref message) = self.pipeline {
            return Err(DetectError::Load(message.clone()));
        }

        log::info!("Loading {} classifier", self.classifier.name());
        match self.classifier.load() {
            Ok(()) => {
                self.pipeline = PipelineStatus::Ready;
                log::info!("All models loaded");
                Ok(())
            }
            Err(err) => {
                log::error!("Model loading failed: {err}");
                self.pipeline = PipelineStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Start or resume the session. No-op while running.
    pub fn start(&mut self) {
        let now = self.clock.now_ms();
        if self.timer.start(now) {
            self.scheduler.arm(now);
            log::info!("Session started at {}", format_time(self.timer.elapsed(now)));
        }
    }

    /// Pause the session. No-op unless running.
    pub fn pause(&mut self) {
        let now = self.clock.now_ms();
        self.scheduler.disarm();
        if self.timer.pause(now) {
            log::info!("Session paused at {}", format_time(self.timer.elapsed(now)));
        }
    }

    /// Stop and zero the session; the state returns to distracted.
    pub fn reset(&mut self) {
        self.scheduler.disarm();
        self.timer.reset();
        self.machine.reset();
        self.last_angle = None;
        self.stats = DetectionStats::default();
        log::info!("Session reset");
    }

    /// Set the detector sensitivity for the next detection tick.
    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.settings.set_sensitivity(sensitivity);
    }

    /// Set the focus angle threshold for the next detection tick.
    pub fn set_angle_threshold(&mut self, degrees: u32) {
        self.settings.set_angle_threshold(degrees);
    }

    /// Run every tick that is due, one at a time, in deadline order.
    pub fn advance(&mut self) -> Vec<TrackerEvent> {
        let mut events = Vec::new();

        loop {
            let now = self.clock.now_ms();
            let Some(task) = self.scheduler.next_due(now) else {
                break;
            };
            if !self.scheduler.begin(task) {
                break;
            }

            match task {
                Task::Display => self.timer.tick(self.machine.state()),
                Task::Detection => {
                    if let Some(event) = self.detect(now) {
                        events.push(event);
                    }
                }
            }

            self.scheduler.finish(task, self.clock.now_ms());
        }

        events
    }

    fn detect(&mut self, now: u64) -> Option<TrackerEvent> {
        if !self.pipeline.is_ready() {
            return None;
        }

        let frame = Frame {
            sequence: self.stats.frames,
            timestamp_ms: now,
        };
        self.stats.frames += 1;

        let options = DetectOptions {
            sensitivity: self.settings.sensitivity(),
        };

        let mut failure = None;
        let observation = match self.classifier.detect(&frame, &options) {
            Ok(faces) => match faces.first() {
                Some(face) => {
                    self.stats.faces += 1;
                    match estimate_angle(&face.landmarks) {
                        Ok(angle) => {
                            self.last_angle = Some(angle);
                            Observation::Face(Some(angle))
                        }
                        Err(err) => {
                            log::debug!("frame {}: angle unknown: {err}", frame.sequence);
                            self.stats.unknown_angles += 1;
                            self.last_angle = None;
                            Observation::Face(None)
                        }
                    }
                }
                None => Observation::NoFace,
            },
            Err(err) => {
                log::warn!("Detection failed on frame {}: {err}", frame.sequence);
                self.stats.failures += 1;
                failure = Some(TrackerEvent::DetectionFailed(err.to_string()));
                Observation::NoFace
            }
        };

        let threshold = f64::from(self.settings.angle_threshold_degrees());
        match self.machine.observe(observation, threshold, now) {
            Some(transition) => {
                log::info!("{} -> {}", transition.from, transition.to);
                Some(TrackerEvent::StateChanged(transition))
            }
            None => failure,
        }
    }

    /// Current display outputs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.now_ms();
        Snapshot {
            elapsed_ms: self.timer.elapsed(now),
            focused_ms: self.timer.focused_ms(),
            distracted_ms: self.timer.distracted_ms(),
            state: self.machine.state(),
            timer: self.timer.state(),
            pipeline: self.pipeline.clone(),
            last_angle: self.last_angle,
            settings: self.settings,
            stats: self.stats,
        }
    }

    #[must_use]
    pub const fn state(&self) -> FocusState {
        self.machine.state()
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    #[must_use]
    pub const fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    #[must_use]
    pub const fn pipeline(&self) -> &PipelineStatus {
        &self.pipeline
    }

    #[must_use]
    pub const fn session_clock(&self) -> &SessionClock {
        &self.timer
    }

    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub const fn clock(&self) -> &K {
        &self.clock
    }

    #[must_use]
    pub const fn classifier(&self) -> &C {
        &self.classifier
    }
}
