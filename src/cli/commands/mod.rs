//! Command implementations for studyfocus.
//!
//! Each command returns the text to print; `main` does the printing.

mod config;
mod models;
mod session;

pub use config::config;
pub use models::models;
pub use session::{replay, run};

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::Shell;
use serde::Deserialize;

use crate::cli::args::{Cli, OutputFormat};
use crate::config::{Config, Paths};
use crate::core::{estimate_angle, FaceLandmarks, Point};
use crate::error::FocusError;
use crate::features::focus::{
    format_time as render_time, FocusStateMachine, Observation, TrackerSettings,
};
use crate::output::{format_angle, to_json, AngleReading};

/// Resolve the configuration file: the explicit one, else `~/.studyfocus/config.yaml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf, FocusError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Paths::new()?.config_file),
    }
}

/// Load the configuration, falling back to defaults when the file is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, FocusError> {
    Config::load_from_path(&config_path(explicit)?)
}

/// Landmark file contents: grouped landmarks or the raw 68-point layout.
#[derive(Deserialize)]
#[serde(untagged)]
enum LandmarkFile {
    Grouped(FaceLandmarks),
    Points { points: Vec<Point> },
    Raw(Vec<Point>),
}

impl LandmarkFile {
    fn into_landmarks(self) -> Result<FaceLandmarks, FocusError> {
        match self {
            Self::Grouped(landmarks) => Ok(landmarks),
            Self::Points { points } | Self::Raw(points) => {
                Ok(FaceLandmarks::from_68_points(&points)?)
            }
        }
    }
}

fn read_landmarks(file: &Path) -> Result<FaceLandmarks, FocusError> {
    if !file.exists() {
        return Err(FocusError::NotFound(format!(
            "landmark file {}",
            file.display()
        )));
    }
    let contents = std::fs::read_to_string(file)?;

    let is_json = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed: LandmarkFile = if is_json {
        serde_json::from_str(&contents)?
    } else {
        serde_yaml::from_str(&contents)?
    };

    parsed.into_landmarks()
}

/// Execute angle command
///
/// # Errors
///
/// Returns an error if the landmark file cannot be read or parsed.
pub fn angle(
    file: &Path,
    threshold: Option<u32>,
    config: &Config,
    format: OutputFormat,
) -> Result<String, FocusError> {
    let landmarks = read_landmarks(file)?;
    let threshold_degrees = TrackerSettings::new(
        config.tracker.sensitivity,
        threshold.unwrap_or(config.tracker.angle_threshold_degrees),
    )
    .angle_threshold_degrees();

    let estimate = estimate_angle(&landmarks);
    if let Err(ref e) = estimate {
        log::warn!("Angle unknown for {}: {e}", file.display());
    }

    // A single reading has no history, so the grace period never applies.
    let state = FocusStateMachine::new(0)
        .target(
            Observation::Face(estimate.as_ref().ok().copied()),
            f64::from(threshold_degrees),
            0,
        )
        .unwrap_or_default();

    let reading = AngleReading {
        angle_degrees: estimate.as_ref().ok().copied(),
        reason: estimate.err().map(|e| e.to_string()),
        threshold_degrees,
        state,
    };

    format_angle(&reading, format)
}

/// Execute format-time command
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_time(ms: u64, format: OutputFormat) -> Result<String, FocusError> {
    let formatted = render_time(ms);
    match format {
        OutputFormat::Pretty => Ok(formatted),
        OutputFormat::Json => to_json(&serde_json::json!({
            "ms": ms,
            "formatted": formatted,
        })),
    }
}

/// Generate shell completions for the specified shell.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn completions(shell: Shell) -> Result<String, FocusError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate_to(&mut buf, shell, &mut cmd);
    String::from_utf8(buf).map_err(|e| FocusError::Parse(format!("UTF-8 error: {e}")))
}

fn generate_to<W: Write>(buf: &mut W, shell: Shell, cmd: &mut clap::Command) {
    clap_complete::generate(shell, cmd, "studyfocus", buf);
}
