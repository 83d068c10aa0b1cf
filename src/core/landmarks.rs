//! Facial landmark geometry.
//!
//! Landmarks are grouped the way the 68-point face model groups them: a nose
//! ridge sequence and one contour per eye. Only these three groups feed the
//! head angle estimate.

use serde::{Deserialize, Serialize};

use crate::core::angle::AngleError;

/// Index range of the nose ridge and tip in the 68-point layout.
const NOSE_RANGE: std::ops::RangeInclusive<usize> = 27..=35;
/// Index range of the left eye contour in the 68-point layout.
const LEFT_EYE_RANGE: std::ops::RangeInclusive<usize> = 36..=41;
/// Index range of the right eye contour in the 68-point layout.
const RIGHT_EYE_RANGE: std::ops::RangeInclusive<usize> = 42..=47;

/// Number of points in the full face layout.
pub const FULL_LAYOUT_POINTS: usize = 68;

/// A 2-D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// The landmark groups of one detected face.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceLandmarks {
    /// Nose ridge from the bridge down to the nostrils.
    pub nose: Vec<Point>,
    /// Left eye contour, starting at the outer corner.
    pub left_eye: Vec<Point>,
    /// Right eye contour, starting at the inner corner.
    pub right_eye: Vec<Point>,
}

impl FaceLandmarks {
    /// Build landmark groups from a full 68-point layout.
    ///
    /// # Errors
    ///
    /// Returns `AngleError::MissingLandmarks` if fewer than 68 points are given.
    pub fn from_68_points(points: &[Point]) -> Result<Self, AngleError> {
        if points.len() < FULL_LAYOUT_POINTS {
            return Err(AngleError::MissingLandmarks {
                group: "face",
                needed: FULL_LAYOUT_POINTS,
                found: points.len(),
            });
        }

        Ok(Self {
            nose: points[NOSE_RANGE].to_vec(),
            left_eye: points[LEFT_EYE_RANGE].to_vec(),
            right_eye: points[RIGHT_EYE_RANGE].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn layout() -> Vec<Point> {
        (0..FULL_LAYOUT_POINTS)
            .map(|i| Point::new(i as f64, (i * 2) as f64))
            .collect()
    }

    #[test]
    fn test_from_68_points_groups() {
        let landmarks = FaceLandmarks::from_68_points(&layout()).unwrap();

        assert_eq!(landmarks.nose.len(), 9);
        assert_eq!(landmarks.left_eye.len(), 6);
        assert_eq!(landmarks.right_eye.len(), 6);
        assert_eq!(landmarks.nose[0], Point::new(27.0, 54.0));
        assert_eq!(landmarks.left_eye[0], Point::new(36.0, 72.0));
        assert_eq!(landmarks.right_eye[3], Point::new(45.0, 90.0));
    }

    #[test]
    fn test_from_68_points_too_short() {
        let points = layout();
        let err = FaceLandmarks::from_68_points(&points[..40]).unwrap_err();
        assert!(matches!(
            err,
            AngleError::MissingLandmarks { found: 40, .. }
        ));
    }

    #[test]
    fn test_point_deserializes_from_object() {
        let p: Point = serde_json::from_str(r#"{"x": 1.5, "y": -2.0}"#).unwrap();
        assert_eq!(p, Point::new(1.5, -2.0));
    }
}
