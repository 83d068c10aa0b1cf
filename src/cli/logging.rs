//! Logger setup.
//!
//! Plain commands log to stderr. The live timer owns the terminal, so while
//! it runs records go to a file next to the configuration instead.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

use crate::error::FocusError;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

const LOG_FILE: &str = "studyfocus.log";

/// Log file used while the terminal UI is open.
#[must_use]
pub fn tui_log_file(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map_or_else(|| PathBuf::from(LOG_FILE), |dir| dir.join(LOG_FILE))
}

/// Build the logger, appending to `log_file` when given, else writing to stderr.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn builder(log_file: Option<&Path>) -> Result<Builder, FocusError> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));

    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, LevelFilter, Log, Record};
    use tempfile::TempDir;

    #[test]
    fn test_tui_log_file_sits_next_to_config() {
        let path = tui_log_file(Path::new("/home/me/.studyfocus/config.yaml"));
        assert_eq!(path, PathBuf::from("/home/me/.studyfocus/studyfocus.log"));
    }

    #[test]
    fn test_file_target_keeps_records_off_the_terminal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join(LOG_FILE);

        let logger = builder(Some(&path))
            .unwrap()
            .filter_level(LevelFilter::Warn)
            .build();
        logger.log(
            &Record::builder()
                .args(format_args!("Detection failed on frame 3: camera busy"))
                .level(Level::Warn)
                .target("studyfocus")
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("camera busy"));
    }
}
