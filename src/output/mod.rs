//! Output formatting for studyfocus.
//!
//! This module provides formatters for displaying session results in various formats.

mod json;
mod pretty;

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::detect::AssetStatus;
use crate::error::FocusError;
use crate::features::focus::FocusState;
use crate::features::replay::ReplayReport;

pub use json::*;
pub use pretty::*;

/// Head angle of one face, classified against a threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleReading {
    /// Estimated angle, `None` when the landmarks are unusable.
    pub angle_degrees: Option<f64>,
    /// Why the angle is unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub threshold_degrees: u32,
    pub state: FocusState,
}

/// Format a replay report based on output format
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn format_report(report: &ReplayReport, format: OutputFormat) -> Result<String, FocusError> {
    match format {
        OutputFormat::Pretty => Ok(format_report_pretty(report)),
        OutputFormat::Json => to_json(report),
    }
}

/// Format an angle reading based on output format
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn format_angle(reading: &AngleReading, format: OutputFormat) -> Result<String, FocusError> {
    match format {
        OutputFormat::Pretty => Ok(format_angle_pretty(reading)),
        OutputFormat::Json => to_json(reading),
    }
}

/// Format model asset checks based on output format
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn format_assets(assets: &[AssetStatus], format: OutputFormat) -> Result<String, FocusError> {
    match format {
        OutputFormat::Pretty => Ok(format_assets_pretty(assets)),
        OutputFormat::Json => format_assets_json(assets),
    }
}

/// Format the configuration based on output format
///
/// # Errors
///
/// Returns `FocusError::Parse` if serialization fails.
pub fn format_config(config: &Config, format: OutputFormat) -> Result<String, FocusError> {
    match format {
        OutputFormat::Pretty => Ok(serde_yaml::to_string(config)?.trim_end().to_string()),
        OutputFormat::Json => to_json(config),
    }
}
