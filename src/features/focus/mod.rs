//! Focus tracking.
//!
//! Turns per-frame head angle readings into a stable focused/distracted
//! measurement:
//! - Focus state machine with a face-loss grace period
//! - Session clock with fixed-quantum accumulation
//! - Two-cadence cooperative scheduler
//! - The tracker session tying them to a classifier

pub mod scheduler;
pub mod state;
pub mod timer;
pub mod tracker;

pub use scheduler::{Scheduler, Task};
pub use state::{FocusState, FocusStateMachine, Observation, Transition};
pub use timer::{format_time, parse_duration_ms, render_progress_bar, SessionClock, TimerState};
pub use tracker::{
    DetectionStats, FocusTracker, PipelineStatus, Snapshot, TrackerEvent, TrackerSettings,
};
