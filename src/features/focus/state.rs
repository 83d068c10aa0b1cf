//! Focused/distracted state machine.
//!
//! Runs once per detection tick. A visible face decides the state from its
//! head angle; a missing face only forces `Distracted` once the grace period
//! since the last detection has run out.

use serde::{Deserialize, Serialize};

/// Default tolerance for face loss before declaring distraction.
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 1000;

/// Whether the user is looking at their work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusState {
    /// Face visible and turned toward the screen.
    Focused,
    /// Face turned away, lost, or not yet seen.
    #[default]
    Distracted,
}

impl FocusState {
    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Focused => "FOCUSED",
            Self::Distracted => "DISTRACTED",
        }
    }

    #[must_use]
    pub const fn is_focused(&self) -> bool {
        matches!(self, Self::Focused)
    }
}

impl std::fmt::Display for FocusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What one detection tick saw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// A face was found. `None` when its angle could not be estimated.
    Face(Option<f64>),
    /// No face, or the detection call failed.
    NoFace,
}

/// A state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: FocusState,
    pub to: FocusState,
}

/// The focus state machine.
#[derive(Debug, Clone)]
pub struct FocusStateMachine {
    state: FocusState,
    last_detection_ms: Option<u64>,
    grace_period_ms: u64,
}

impl FocusStateMachine {
    #[must_use]
    pub const fn new(grace_period_ms: u64) -> Self {
        Self {
            state: FocusState::Distracted,
            last_detection_ms: None,
            grace_period_ms,
        }
    }

    #[must_use]
    pub const fn state(&self) -> FocusState {
        self.state
    }

    /// Time of the most recent tick that found a face.
    #[must_use]
    pub const fn last_detection_ms(&self) -> Option<u64> {
        self.last_detection_ms
    }

    #[must_use]
    pub const fn grace_period_ms(&self) -> u64 {
        self.grace_period_ms
    }

    /// Target state for an observation, or `None` to hold.
    ///
    /// Only strictly smaller angles count as focused.
    #[must_use]
    pub fn target(&self, observation: Observation, threshold_degrees: f64, now_ms: u64) -> Option<FocusState> {
        match observation {
            Observation::Face(Some(angle)) if angle < threshold_degrees => Some(FocusState::Focused),
            Observation::Face(_) => Some(FocusState::Distracted),
            Observation::NoFace => match self.last_detection_ms {
                Some(last) if now_ms.saturating_sub(last) <= self.grace_period_ms => None,
                _ => Some(FocusState::Distracted),
            },
        }
    }

    /// Apply one detection tick.
    ///
    /// Returns the transition if the state changed. Repeating the current
    /// state is not reported.
    pub fn observe(
        &mut self,
        observation: Observation,
        threshold_degrees: f64,
        now_ms: u64,
    ) -> Option<Transition> {
        let target = self.target(observation, threshold_degrees, now_ms);

        if matches!(observation, Observation::Face(_)) {
            self.last_detection_ms = Some(now_ms);
        }

        match target {
            Some(to) if to != self.state => {
                let from = self.state;
                self.state = to;
                Some(Transition { from, to })
            }
            _ => None,
        }
    }

    /// Back to `Distracted` with no detection history.
    pub fn reset(&mut self) {
        self.state = FocusState::Distracted;
        self.last_detection_ms = None;
    }
}

impl Default for FocusStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD_MS)
    }
}
