//! Configuration settings for studyfocus.
//!
//! Settings are loaded from `~/.studyfocus/config.yaml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::FocusError;
use crate::features::focus::scheduler::DEFAULT_DETECTION_INTERVAL_MS;
use crate::features::focus::state::DEFAULT_GRACE_PERIOD_MS;
use crate::features::focus::timer::DEFAULT_DISPLAY_INTERVAL_MS;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Focus tracker settings.
    pub tracker: TrackerConfig,
    /// Model asset settings.
    pub models: ModelsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
}

/// Focus tracker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Minimum detector score for a face to count (0.1 - 0.9).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    /// Head angle below which the user counts as focused.
    #[serde(default = "default_angle_threshold")]
    pub angle_threshold_degrees: u32,
    /// How long a lost face keeps the current state.
    #[serde(default = "default_grace_period")]
    pub grace_period_ms: u64,
    /// Display tick, also the accumulation quantum.
    #[serde(default = "default_display_interval")]
    pub display_interval_ms: u64,
    /// Detection tick.
    #[serde(default = "default_detection_interval")]
    pub detection_interval_ms: u64,
}

/// Model asset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Directory holding the weight manifests.
    #[serde(default = "default_models_dir")]
    pub dir: PathBuf,
    /// Site prefix; when set, models live under `<base_path>/models`.
    #[serde(default)]
    pub base_path: Option<String>,
    /// Refuse to start detection unless all manifests are present.
    #[serde(default)]
    pub require_assets: bool,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_sensitivity() -> f64 {
    0.5
}

const fn default_angle_threshold() -> u32 {
    25
}

const fn default_grace_period() -> u64 {
    DEFAULT_GRACE_PERIOD_MS
}

const fn default_display_interval() -> u64 {
    DEFAULT_DISPLAY_INTERVAL_MS
}

const fn default_detection_interval() -> u64 {
    DEFAULT_DETECTION_INTERVAL_MS
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            angle_threshold_degrees: default_angle_threshold(),
            grace_period_ms: default_grace_period(),
            display_interval_ms: default_display_interval(),
            detection_interval_ms: default_detection_interval(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: default_models_dir(),
            base_path: None,
            require_assets: false,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, FocusError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, FocusError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            FocusError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            FocusError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &Path) -> Result<(), FocusError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| FocusError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            FocusError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
