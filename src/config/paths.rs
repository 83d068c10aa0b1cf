//! Path resolution for studyfocus configuration and data files.
//!
//! All studyfocus data is stored in `~/.studyfocus/`:
//! - `config.yaml` - Main configuration file
//! - `traces/` - Recorded detection traces for replay

use std::path::PathBuf;

use crate::error::FocusError;

/// Paths to studyfocus configuration and data directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.studyfocus/`
    pub root: PathBuf,
    /// Config file: `~/.studyfocus/config.yaml`
    pub config_file: PathBuf,
    /// Traces directory: `~/.studyfocus/traces/`
    pub traces: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, FocusError> {
        let home = std::env::var("HOME")
            .map_err(|_| FocusError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".studyfocus")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            traces: root.join("traces"),
            root,
        }
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), FocusError> {
        for dir in [&self.root, &self.traces] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    FocusError::Config(format!("Failed to create directory {}: {e}", dir.display()))
                })?;
            }
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".studyfocus"))
        })
    }
}
