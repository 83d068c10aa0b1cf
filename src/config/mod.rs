//! Configuration management for studyfocus.
//!
//! This module handles loading and saving configuration from `~/.studyfocus/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{Config, GeneralConfig, ModelsConfig, TrackerConfig};
