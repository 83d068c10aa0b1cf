//! Configuration command implementation.

use std::path::Path;

use colored::Colorize;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::Config;
use crate::error::FocusError;
use crate::output::{format_config, to_json};

/// Execute config subcommands.
///
/// `path` is the resolved configuration file; `config` is what was loaded from it.
///
/// # Errors
///
/// Returns an error if the file cannot be written or output formatting fails.
pub fn config(
    cmd: ConfigCommands,
    path: &Path,
    config: &Config,
    format: OutputFormat,
) -> Result<String, FocusError> {
    match cmd {
        ConfigCommands::Show => format_config(config, format),

        ConfigCommands::Path => match format {
            OutputFormat::Pretty => Ok(path.display().to_string()),
            OutputFormat::Json => to_json(&serde_json::json!({
                "path": path,
                "exists": path.exists(),
            })),
        },

        ConfigCommands::Init { force } => init(path, force, format),
    }
}

fn init(path: &Path, force: bool, format: OutputFormat) -> Result<String, FocusError> {
    if path.exists() && !force {
        return Err(FocusError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Config::default().save_to_path(path)?;
    log::info!("Wrote default configuration to {}", path.display());

    match format {
        OutputFormat::Pretty => Ok(format!(
            "{} Wrote default configuration to {}",
            "✓".green(),
            path.display()
        )),
        OutputFormat::Json => to_json(&serde_json::json!({
            "path": path,
            "written": true,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_init_and_show() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        config(ConfigCommands::Init { force: false }, &path, &Config::default(), OutputFormat::Pretty)
            .unwrap();
        assert!(path.exists());

        let loaded = Config::load_from_path(&path).unwrap();
        let output = config(ConfigCommands::Show, &path, &loaded, OutputFormat::Pretty).unwrap();
        assert!(output.contains("angle_threshold_degrees: 25"));
    }

    #[test]
    fn test_config_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "tracker:\n  sensitivity: 0.7\n").unwrap();

        let err = config(ConfigCommands::Init { force: false }, &path, &Config::default(), OutputFormat::Pretty)
            .unwrap_err();
        assert!(matches!(err, FocusError::Config(_)));

        config(ConfigCommands::Init { force: true }, &path, &Config::default(), OutputFormat::Json)
            .unwrap();
        let loaded = Config::load_from_path(&path).unwrap();
        assert!((loaded.tracker.sensitivity - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_path_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let output = config(ConfigCommands::Path, &path, &Config::default(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["exists"], false);
    }
}
