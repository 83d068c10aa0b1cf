//! Model asset resolution and checks.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ModelsConfig;
use crate::detect::DetectError;

/// Weight manifests the face pipeline needs, as `(model, file)` pairs.
pub const MODEL_MANIFESTS: [(&str, &str); 3] = [
    (
        "tiny face detector",
        "tiny_face_detector_model-weights_manifest.json",
    ),
    (
        "68-point landmarks",
        "face_landmark_68_model-weights_manifest.json",
    ),
    (
        "face recognition",
        "face_recognition_model-weights_manifest.json",
    ),
];

/// Presence of one model manifest on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetStatus {
    pub model: &'static str,
    pub path: PathBuf,
    pub present: bool,
}

/// The directory models are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAssets {
    dir: PathBuf,
}

impl ModelAssets {
    /// Use an explicit model directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the model directory from configuration.
    ///
    /// A site base path wins over the plain directory: models are then
    /// expected under `<base_path>/models`.
    #[must_use]
    pub fn from_config(config: &ModelsConfig) -> Self {
        match config.base_path.as_deref() {
            Some(base) if !base.trim().is_empty() => Self::new(Path::new(base).join("models")),
            _ => Self::new(&config.dir),
        }
    }

    /// The resolved directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check every manifest.
    #[must_use]
    pub fn check(&self) -> Vec<AssetStatus> {
        MODEL_MANIFESTS
            .into_iter()
            .map(|(model, file)| {
                let path = self.dir.join(file);
                AssetStatus {
                    model,
                    present: path.is_file(),
                    path,
                }
            })
            .collect()
    }

    /// Fail unless every manifest is present.
    ///
    /// # Errors
    ///
    /// Returns `DetectError::Load` naming the missing models.
    pub fn verify(&self) -> Result<(), DetectError> {
        let missing: Vec<&str> = self
            .check()
            .into_iter()
            .filter(|s| !s.present)
            .map(|s| s.model)
            .collect();

        if missing.is_empty() {
            log::info!("All models found in {}", self.dir.display());
            Ok(())
        } else {
            Err(DetectError::Load(format!(
                "missing {} in {}",
                missing.join(", "),
                self.dir.display()
            )))
        }
    }
}
