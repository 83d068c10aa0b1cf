//! Model asset command implementation.

use crate::cli::args::{ModelsCommands, OutputFormat};
use crate::config::Config;
use crate::detect::ModelAssets;
use crate::error::FocusError;
use crate::output::format_assets;

/// Execute models subcommands.
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn models(
    cmd: ModelsCommands,
    config: &Config,
    format: OutputFormat,
) -> Result<String, FocusError> {
    match cmd {
        ModelsCommands::Check { dir } => {
            let assets = dir.map_or_else(|| ModelAssets::from_config(&config.models), ModelAssets::new);
            log::debug!("Checking models in {}", assets.dir().display());
            format_assets(&assets.check(), format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::MODEL_MANIFESTS;
    use tempfile::TempDir;

    #[test]
    fn test_models_check_explicit_dir() {
        let dir = TempDir::new().unwrap();
        for (_, file) in MODEL_MANIFESTS {
            std::fs::write(dir.path().join(file), "[]").unwrap();
        }

        let output = models(
            ModelsCommands::Check {
                dir: Some(dir.path().to_path_buf()),
            },
            &Config::default(),
            OutputFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["complete"], true);
    }

    #[test]
    fn test_models_check_configured_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.models.base_path = Some(dir.path().display().to_string());

        let output = models(
            ModelsCommands::Check { dir: None },
            &config,
            OutputFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["complete"], false);
    }
}
