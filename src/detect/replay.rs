//! Replay backend.
//!
//! Feeds a recorded trace of per-frame results through the classifier seam,
//! one entry per `detect` call. Traces are YAML (or JSON) files:
//!
//! ```yaml
//! cycle: false
//! frames:
//!   - face:
//!       score: 0.92
//!       points: [{x: 312.0, y: 210.5}, ...]  # full 68-point layout
//!     repeat: 10
//!   - repeat: 3                 # no face for three frames
//!   - error: camera busy        # one failed inference
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{FaceLandmarks, Point};
use crate::detect::{
    Classifier, DetectError, DetectOptions, FaceDetection, Frame, ModelAssets,
};

/// A recorded session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Start over when the frames run out instead of reporting no face.
    #[serde(default)]
    pub cycle: bool,
    /// Frame entries in playback order.
    #[serde(default)]
    pub frames: Vec<TraceEntry>,
}

/// One or more identical frames.
///
/// An entry with neither `face` nor `error` is a frame without a face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<TraceFace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of consecutive frames this entry stands for.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// A recorded face, either as grouped landmarks or as the raw 68 points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFace {
    #[serde(default = "default_score")]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<FaceLandmarks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
}

impl Default for TraceEntry {
    fn default() -> Self {
        Self {
            face: None,
            error: None,
            repeat: default_repeat(),
        }
    }
}

const fn default_repeat() -> u32 {
    1
}

const fn default_score() -> f64 {
    1.0
}

impl TraceFace {
    fn to_detection(&self) -> Result<FaceDetection, DetectError> {
        let landmarks = match (&self.landmarks, &self.points) {
            (Some(landmarks), _) => landmarks.clone(),
            (None, Some(points)) => FaceLandmarks::from_68_points(points)
                .map_err(|e| DetectError::Load(e.to_string()))?,
            (None, None) => {
                return Err(DetectError::Load(
                    "face entry has neither landmarks nor points".to_string(),
                ))
            }
        };

        Ok(FaceDetection {
            score: self.score,
            landmarks,
        })
    }
}

impl Trace {
    /// Read a trace file. `.json` files are parsed as JSON, anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns `DetectError::Load` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, DetectError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DetectError::Load(format!("failed to read trace {}: {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str(&contents).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&contents).map_err(|e| e.to_string())
        };

        parsed.map_err(|e| {
            DetectError::Load(format!("failed to parse trace {}: {e}", path.display()))
        })
    }

    /// Total number of frames covered by the trace.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames.iter().map(|e| u64::from(e.repeat)).sum()
    }
}

/// Outcome of one replayed frame.
#[derive(Debug, Clone, PartialEq)]
enum Playback {
    Face(FaceDetection),
    NoFace,
    Error(String),
}

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Inline(Trace),
}

/// Classifier that replays a [`Trace`].
///
/// Entries are kept as recorded; a cursor steps through each entry's
/// `repeat` count, so large repeats cost nothing up front.
#[derive(Debug, Clone)]
pub struct ReplayClassifier {
    source: Source,
    models: Option<ModelAssets>,
    entries: Vec<(Playback, u32)>,
    entry: usize,
    used_in_entry: u32,
    total: u64,
    played: u64,
    cycle: bool,
    loaded: bool,
}

impl ReplayClassifier {
    /// Replay a trace file, read during `load`.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_source(Source::File(path.into()))
    }

    /// Replay an in-memory trace.
    #[must_use]
    pub fn from_trace(trace: Trace) -> Self {
        Self::with_source(Source::Inline(trace))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            models: None,
            entries: Vec::new(),
            entry: 0,
            used_in_entry: 0,
            total: 0,
            played: 0,
            cycle: false,
            loaded: false,
        }
    }

    /// Require model assets to be present before the trace is loaded.
    #[must_use]
    pub fn require_models(mut self, assets: ModelAssets) -> Self {
        self.models = Some(assets);
        self
    }

    /// Frames not yet replayed, or `None` when cycling.
    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        if self.cycle {
            None
        } else {
            Some(self.total.saturating_sub(self.played))
        }
    }

    fn entries(trace: &Trace) -> Result<Vec<(Playback, u32)>, DetectError> {
        trace
            .frames
            .iter()
            .filter(|entry| entry.repeat > 0)
            .map(|entry| {
                let playback = match (&entry.error, &entry.face) {
                    (Some(message), _) => Playback::Error(message.clone()),
                    (None, Some(face)) => Playback::Face(face.to_detection()?),
                    (None, None) => Playback::NoFace,
                };
                Ok((playback, entry.repeat))
            })
            .collect()
    }

    fn next_frame(&mut self) -> Playback {
        if self.entry >= self.entries.len() {
            if self.cycle && !self.entries.is_empty() {
                self.entry = 0;
                self.used_in_entry = 0;
                self.played = 0;
            } else {
                return Playback::NoFace;
            }
        }

        let (playback, repeat) = self.entries[self.entry].clone();
        self.used_in_entry += 1;
        self.played += 1;
        if self.used_in_entry >= repeat {
            self.entry += 1;
            self.used_in_entry = 0;
        }
        playback
    }
}

impl Classifier for ReplayClassifier {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn load(&mut self) -> Result<(), DetectError> {
        if let Some(ref assets) = self.models {
            assets.verify()?;
        }

        let trace = match self.source {
            Source::File(ref path) => Trace::from_path(path)?,
            Source::Inline(ref trace) => trace.clone(),
        };

        self.entries = Self::entries(&trace)?;
        self.total = trace.frame_count();
        self.cycle = trace.cycle;
        self.entry = 0;
        self.used_in_entry = 0;
        self.played = 0;
        self.loaded = true;

        log::info!(
            "Replay classifier loaded {} frames (cycle: {})",
            self.total,
            self.cycle
        );
        Ok(())
    }

    fn detect(
        &mut self,
        frame: &Frame,
        options: &DetectOptions,
    ) -> Result<Vec<FaceDetection>, DetectError> {
        if !self.loaded {
            return Err(DetectError::NotLoaded);
        }

        match self.next_frame() {
            Playback::Face(face) if face.score >= options.sensitivity => Ok(vec![face]),
            Playback::Face(face) => {
                log::trace!(
                    "frame {}: face score {:.2} below sensitivity {:.2}",
                    frame.sequence,
                    face.score,
                    options.sensitivity
                );
                Ok(Vec::new())
            }
            Playback::NoFace => Ok(Vec::new()),
            Playback::Error(message) => Err(DetectError::Inference(message)),
        }
    }
}
