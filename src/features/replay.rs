//! Offline session replay.
//!
//! Runs a tracker against any classifier on a simulated clock, stepping one
//! display interval at a time, and collects what happened.

use serde::Serialize;

use crate::config::TrackerConfig;
use crate::core::{Clock, ManualClock};
use crate::detect::Classifier;
use crate::error::FocusError;
use crate::features::focus::{FocusState, FocusTracker, Snapshot, TrackerEvent};

/// A state change at a point in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    pub from: FocusState,
    pub to: FocusState,
}

/// A failed detection tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    pub at_ms: u64,
    pub message: String,
}

/// Outcome of a replayed session.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub classifier: &'static str,
    pub duration_ms: u64,
    pub summary: Snapshot,
    pub timeline: Vec<TimelineEntry>,
    pub failures: Vec<FailureEntry>,
}

/// Replay a session of `duration_ms`.
///
/// # Errors
///
/// Returns `FocusError::Model` if the classifier fails to load. The session
/// does not run in that case.
pub fn run_replay<C: Classifier>(
    classifier: C,
    config: &TrackerConfig,
    duration_ms: u64,
) -> Result<ReplayReport, FocusError> {
    let clock = ManualClock::new(0);
    let mut tracker = FocusTracker::new(classifier, clock.clone(), config);
    tracker.load()?;

    let step = config.display_interval_ms.max(1);
    let mut timeline = Vec::new();
    let mut failures = Vec::new();

    tracker.start();
    while clock.now_ms() < duration_ms {
        clock.advance(step.min(duration_ms - clock.now_ms()));
        for event in tracker.advance() {
            let at_ms = clock.now_ms();
            match event {
                TrackerEvent::StateChanged(t) => timeline.push(TimelineEntry {
                    at_ms,
                    from: t.from,
                    to: t.to,
                }),
                TrackerEvent::DetectionFailed(message) => {
                    failures.push(FailureEntry { at_ms, message });
                }
            }
        }
    }
    tracker.pause();

    log::info!(
        "Replay finished: {} transitions, {} failed ticks",
        timeline.len(),
        failures.len()
    );

    Ok(ReplayReport {
        classifier: tracker.classifier().name(),
        duration_ms,
        summary: tracker.snapshot(),
        timeline,
        failures,
    })
}
