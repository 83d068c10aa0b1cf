//! studyfocus - a head-angle study focus timer
//!
//! Samples face landmarks on a fixed cadence, estimates how far the head is
//! turned from the screen, and accumulates focused and distracted time.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod detect;
pub mod error;
pub mod features;
pub mod output;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::FocusError;
