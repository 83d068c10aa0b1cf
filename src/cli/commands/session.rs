//! Session commands: the live timer and offline replay.

use crate::cli::args::{OutputFormat, ReplayArgs, RunArgs};
use crate::config::{Config, TrackerConfig};
use crate::detect::{ModelAssets, ReplayClassifier, Trace};
use crate::error::FocusError;
use crate::features::focus::parse_duration_ms;
use crate::features::replay::run_replay;
use crate::output::format_report;

fn tracker_config(args: &ReplayArgs, config: &Config) -> TrackerConfig {
    let mut tracker = config.tracker.clone();
    if let Some(sensitivity) = args.sensitivity {
        tracker.sensitivity = sensitivity;
    }
    if let Some(threshold) = args.threshold {
        tracker.angle_threshold_degrees = threshold;
    }
    tracker
}

fn classifier(trace: Trace, config: &Config) -> ReplayClassifier {
    let classifier = ReplayClassifier::from_trace(trace);
    if config.models.require_assets {
        classifier.require_models(ModelAssets::from_config(&config.models))
    } else {
        classifier
    }
}

fn read_trace(path: &std::path::Path) -> Result<Trace, FocusError> {
    if !path.exists() {
        return Err(FocusError::NotFound(format!("trace {}", path.display())));
    }
    Ok(Trace::from_path(path)?)
}

/// Execute replay command
///
/// # Errors
///
/// Returns an error if the trace cannot be read, the duration is invalid,
/// or the models fail to load.
pub fn replay(
    args: &ReplayArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<String, FocusError> {
    let trace = read_trace(&args.trace)?;
    let tracker = tracker_config(args, config);

    let duration_ms = match args.duration.as_deref() {
        Some(raw) => parse_duration_ms(raw).ok_or_else(|| {
            FocusError::Parse(format!(
                "Invalid duration '{raw}'. Use e.g. 90s, 5m, 1h30m"
            ))
        })?,
        None => trace
            .frame_count()
            .saturating_mul(tracker.detection_interval_ms),
    };
    log::debug!(
        "Replaying {} for {duration_ms} ms",
        args.trace.display()
    );

    let report = run_replay(classifier(trace, config), &tracker, duration_ms)?;
    format_report(&report, format)
}

/// Execute run command
///
/// # Errors
///
/// Returns an error if the trace cannot be read or the terminal fails.
pub fn run(args: &RunArgs, config: &Config) -> Result<String, FocusError> {
    let trace = match args.trace.as_deref() {
        Some(path) => read_trace(path)?,
        None => Trace::default(),
    };

    crate::tui::run(classifier(trace, config), &config.tracker, args.autostart)?;
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const TRACE: &str = r"
frames:
  - face:
      score: 0.9
      landmarks:
        nose: [{x: 100, y: 0}, {x: 100, y: 10}, {x: 100, y: 20}, {x: 100, y: 30},
               {x: 100, y: 40}, {x: 100, y: 50}, {x: 100, y: 60}]
        left_eye: [{x: 60, y: 0}, {x: 60, y: 0}, {x: 60, y: 0}, {x: 60, y: 0}]
        right_eye: [{x: 140, y: 0}, {x: 140, y: 0}, {x: 140, y: 0}, {x: 140, y: 0}]
    repeat: 6
";

    fn args(trace: PathBuf) -> ReplayArgs {
        ReplayArgs {
            trace,
            duration: None,
            threshold: None,
            sensitivity: None,
        }
    }

    #[test]
    fn test_replay_defaults_to_trace_length() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.yaml");
        std::fs::write(&path, TRACE).unwrap();

        let output = replay(&args(path), &Config::default(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        // 6 frames at 500 ms each.
        assert_eq!(value["duration_ms"], 3_000);
        assert_eq!(value["summary"]["state"], "focused");
        assert_eq!(value["timeline"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_replay_sensitivity_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.yaml");
        std::fs::write(&path, TRACE).unwrap();

        let mut replay_args = args(path);
        replay_args.duration = Some("2s".to_string());
        replay_args.sensitivity = Some(0.95);

        let output = replay(&replay_args, &Config::default(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        // Clamped to 0.9, which a 0.9 score still meets.
        assert_eq!(value["duration_ms"], 2_000);
        assert_eq!(value["summary"]["settings"]["sensitivity"], 0.9);
        assert_eq!(value["summary"]["state"], "focused");
    }

    #[test]
    fn test_replay_invalid_duration() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.yaml");
        std::fs::write(&path, TRACE).unwrap();

        let mut replay_args = args(path);
        replay_args.duration = Some("soon".to_string());

        let err = replay(&replay_args, &Config::default(), OutputFormat::Pretty).unwrap_err();
        assert!(matches!(err, FocusError::Parse(_)));
    }

    #[test]
    fn test_replay_missing_trace() {
        let err = replay(
            &args(PathBuf::from("/nonexistent/trace.yaml")),
            &Config::default(),
            OutputFormat::Pretty,
        )
        .unwrap_err();
        assert!(matches!(err, FocusError::NotFound(_)));
    }

    #[test]
    fn test_replay_requires_assets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.yaml");
        std::fs::write(&path, TRACE).unwrap();

        let mut config = Config::default();
        config.models.require_assets = true;
        config.models.dir = dir.path().join("models");

        let err = replay(&args(path), &config, OutputFormat::Pretty).unwrap_err();
        assert!(matches!(err, FocusError::Model(_)));
    }
}
