//! Core abstractions for studyfocus.
//!
//! Landmark geometry, the head angle estimate and the clocks every other
//! module runs on.

pub mod angle;
mod clock;
pub mod landmarks;

pub use angle::{estimate_angle, AngleError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use landmarks::{FaceLandmarks, Point};
