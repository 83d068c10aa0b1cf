//! Face classifier adapter.
//!
//! The face detector and landmark model are external capabilities. This
//! module defines the seam the tracker talks to, plus a replay backend that
//! feeds recorded results through it.

mod models;
mod replay;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::FaceLandmarks;

pub use models::{AssetStatus, ModelAssets, MODEL_MANIFESTS};
pub use replay::{ReplayClassifier, Trace, TraceEntry, TraceFace};

/// Handle to one sampled camera frame.
///
/// Pixel acquisition lives outside the crate; backends that need pixels
/// look them up by sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Monotonic frame counter for the session, starting at 0.
    pub sequence: u64,
    /// Tracker clock time at which the frame was sampled.
    pub timestamp_ms: u64,
}

/// Per-call detection options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectOptions {
    /// Minimum detector score for a face to be reported.
    pub sensitivity: f64,
}

/// One detected face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    /// Detector confidence in `[0, 1]`.
    pub score: f64,
    /// Landmark groups used for the head angle.
    pub landmarks: FaceLandmarks,
}

/// Classifier failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// `detect` was called before a successful `load`.
    #[error("models are not loaded")]
    NotLoaded,

    /// Model or resource loading failed.
    #[error("failed to load models: {0}")]
    Load(String),

    /// A single inference call failed.
    #[error("inference failed: {0}")]
    Inference(String),
}

/// A face classifier backend.
///
/// `load` must succeed before `detect` is called. Results are ordered by
/// the backend; the tracker only looks at the first one.
#[cfg_attr(test, mockall::automock)]
pub trait Classifier {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Load models and any other resources.
    ///
    /// # Errors
    ///
    /// Returns `DetectError::Load` if a resource is missing or unreadable.
    fn load(&mut self) -> Result<(), DetectError>;

    /// Detect faces in a frame.
    ///
    /// # Errors
    ///
    /// Returns `DetectError::NotLoaded` before a successful `load` and
    /// `DetectError::Inference` when the call fails.
    fn detect(
        &mut self,
        frame: &Frame,
        options: &DetectOptions,
    ) -> Result<Vec<FaceDetection>, DetectError>;
}
