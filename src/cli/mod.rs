//! Command-line interface: argument definitions, command implementations
//! and logger setup.

pub mod args;
pub mod commands;
pub mod logging;
