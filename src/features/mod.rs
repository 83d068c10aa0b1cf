//! Feature implementations for studyfocus.
//!
//! - Focus tracking (state machine, session clock, scheduler, tracker)
//! - Session replay against recorded traces

pub mod focus;
pub mod replay;
