//! Session clock and time formatting.
//!
//! Elapsed time is measured from the clock; focused and distracted time are
//! accumulated one fixed quantum per display tick.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::features::focus::state::FocusState;

/// Default display tick, and the quantum added per tick.
pub const DEFAULT_DISPLAY_INTERVAL_MS: u64 = 100;

const MS_PER_HOUR: u64 = 3_600_000;
const SECONDS_PER_DAY: u64 = 86_400;

/// Timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Nothing recorded yet, or just reset.
    Stopped,
    /// Timer is running
    Running,
    /// Timer is paused
    Paused,
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

/// Elapsed time plus focused/distracted accumulators.
#[derive(Debug, Clone)]
pub struct SessionClock {
    running: bool,
    window_start_ms: u64,
    accumulated_before_pause_ms: u64,
    focused_ms: u64,
    distracted_ms: u64,
    ticks: u64,
    quantum_ms: u64,
}

impl SessionClock {
    /// Create a stopped clock adding `quantum_ms` per tick.
    #[must_use]
    pub const fn new(quantum_ms: u64) -> Self {
        Self {
            running: false,
            window_start_ms: 0,
            accumulated_before_pause_ms: 0,
            focused_ms: 0,
            distracted_ms: 0,
            ticks: 0,
            quantum_ms,
        }
    }

    /// Start or resume. Returns false if already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.running {
            return false;
        }
        self.window_start_ms = now_ms;
        self.running = true;
        true
    }

    /// Pause, folding the running window into the paused total.
    /// Returns false if not running.
    pub fn pause(&mut self, now_ms: u64) -> bool {
        if !self.running {
            return false;
        }
        self.accumulated_before_pause_ms = self
            .accumulated_before_pause_ms
            .saturating_add(now_ms.saturating_sub(self.window_start_ms));
        self.running = false;
        true
    }

    /// Zero everything and stop.
    pub fn reset(&mut self) {
        *self = Self::new(self.quantum_ms);
    }

    /// Attribute one quantum to the accumulator for `state`.
    ///
    /// Ignored while not running.
    pub fn tick(&mut self, state: FocusState) {
        if !self.running {
            return;
        }
        match state {
            FocusState::Focused => self.focused_ms = self.focused_ms.saturating_add(self.quantum_ms),
            FocusState::Distracted => {
                self.distracted_ms = self.distracted_ms.saturating_add(self.quantum_ms);
            }
        }
        self.ticks += 1;
    }

    /// Total elapsed time at `now_ms`, excluding pauses.
    #[must_use]
    pub const fn elapsed(&self, now_ms: u64) -> u64 {
        if self.running {
            self.accumulated_before_pause_ms
                .saturating_add(now_ms.saturating_sub(self.window_start_ms))
        } else {
            self.accumulated_before_pause_ms
        }
    }

    #[must_use]
    pub const fn focused_ms(&self) -> u64 {
        self.focused_ms
    }

    #[must_use]
    pub const fn distracted_ms(&self) -> u64 {
        self.distracted_ms
    }

    /// Display ticks counted since the last reset.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub const fn quantum_ms(&self) -> u64 {
        self.quantum_ms
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Get the current state.
    #[must_use]
    pub const fn state(&self) -> TimerState {
        if self.running {
            TimerState::Running
        } else if self.accumulated_before_pause_ms > 0 || self.ticks > 0 {
            TimerState::Paused
        } else {
            TimerState::Stopped
        }
    }

    /// Share of sampled time spent focused (0.0 - 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn focus_ratio(&self) -> f64 {
        let total = self.focused_ms.saturating_add(self.distracted_ms);
        if total == 0 {
            return 0.0;
        }
        self.focused_ms as f64 / total as f64
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_INTERVAL_MS)
    }
}

/// Format milliseconds as `MM:SS`, or `HH:MM:SS` from one hour up.
///
/// Components are floored and taken modulo 24 hours, like reading a clock
/// face `ms` after midnight.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_time(ms: u64) -> String {
    let seconds = ((ms / 1000) % SECONDS_PER_DAY) as u32;
    let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0) else {
        return "00:00".to_string();
    };

    if ms >= MS_PER_HOUR {
        format!(
            "{:02}:{:02}:{:02}",
            time.hour(),
            time.minute(),
            time.second()
        )
    } else {
        format!("{:02}:{:02}", time.minute(), time.second())
    }
}

/// Parse a duration string like "25m", "1h30m", "90s" into milliseconds.
///
/// A bare number is taken as seconds.
#[must_use]
pub fn parse_duration_ms(s: &str) -> Option<u64> {
    let s = s.trim().to_lowercase();

    if let Ok(seconds) = s.parse::<u64>() {
        return seconds.checked_mul(1000).filter(|ms| *ms > 0);
    }

    let mut total_ms: u64 = 0;
    let mut current_num = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            current_num.push(c);
            continue;
        }
        if current_num.is_empty() {
            return None;
        }
        let num: u64 = current_num.parse().ok()?;
        current_num.clear();

        let unit_ms = match c {
            'h' => 3_600_000,
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                1
            }
            'm' => 60_000,
            's' => 1000,
            _ => return None,
        };
        total_ms = total_ms.checked_add(num.checked_mul(unit_ms)?)?;
    }

    // Trailing number without unit is seconds
    if !current_num.is_empty() {
        let num: u64 = current_num.parse().ok()?;
        total_ms = total_ms.checked_add(num.checked_mul(1000)?)?;
    }

    if total_ms > 0 {
        Some(total_ms)
    } else {
        None
    }
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
