//! Error types for studyfocus.

use thiserror::Error;

use crate::core::AngleError;
use crate::detect::DetectError;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum FocusError {
    /// Configuration could not be read, parsed or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Model assets failed to load.
    #[error("Model error: {0}")]
    Model(String),

    /// A detection call failed.
    ///
    /// Only raised when a classifier is driven directly. The tracker turns
    /// per-tick failures into `TrackerEvent::DetectionFailed` instead.
    #[error("Detection error: {0}")]
    Detection(String),

    /// A requested file or item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl From<serde_json::Error> for FocusError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for FocusError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<AngleError> for FocusError {
    fn from(err: AngleError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<DetectError> for FocusError {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::NotLoaded | DetectError::Load(_) => Self::Model(err.to_string()),
            DetectError::Inference(_) => Self::Detection(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_error_mapping() {
        let err: FocusError = DetectError::Load("missing weights".to_string()).into();
        assert!(matches!(err, FocusError::Model(_)));

        let err: FocusError = DetectError::Inference("timeout".to_string()).into();
        assert!(matches!(err, FocusError::Detection(_)));
    }

    #[test]
    fn test_error_display() {
        let err = FocusError::NotFound("trace.yaml".to_string());
        assert_eq!(err.to_string(), "Not found: trace.yaml");
    }
}
