//! Head angle estimation from 2-D landmarks.
//!
//! The estimate is a yaw approximation: how far the nose tip sits from the
//! midpoint between the outer eye corners, relative to the length of the nose
//! ridge. It is only meaningful for the 68-point landmark layout and degrades
//! for strong tilts or occlusion.

use thiserror::Error;

use crate::core::landmarks::FaceLandmarks;

/// Nose ridge points required (indices 0, 3 and 6 are read).
const NOSE_POINTS: usize = 7;
/// Eye contour points required per eye (indices 0 and 3 are read).
const EYE_POINTS: usize = 4;

const NOSE_TOP: usize = 0;
const NOSE_TIP: usize = 3;
const NOSE_BOTTOM: usize = 6;
const LEFT_OUTER_CORNER: usize = 0;
const RIGHT_OUTER_CORNER: usize = 3;

/// Reasons the angle of a detected face is unknown.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AngleError {
    /// A landmark group has too few points.
    #[error("{group} landmarks incomplete: need {needed}, found {found}")]
    MissingLandmarks {
        group: &'static str,
        needed: usize,
        found: usize,
    },

    /// The nose ridge has no vertical extent.
    #[error("degenerate landmarks: nose height is zero")]
    Degenerate,
}

/// Estimate the head rotation in degrees.
///
/// The result is in `[0, 90)`; zero means the nose is centered between
/// the eyes.
///
/// # Errors
///
/// Returns `AngleError::MissingLandmarks` when a group is too short and
/// `AngleError::Degenerate` when the nose height is zero or the geometry
/// produces a non-finite value.
pub fn estimate_angle(landmarks: &FaceLandmarks) -> Result<f64, AngleError> {
    require(&landmarks.nose, "nose", NOSE_POINTS)?;
    require(&landmarks.left_eye, "left eye", EYE_POINTS)?;
    require(&landmarks.right_eye, "right eye", EYE_POINTS)?;

    let eye_mid_x =
        (landmarks.left_eye[LEFT_OUTER_CORNER].x + landmarks.right_eye[RIGHT_OUTER_CORNER].x) / 2.0;
    let nose_x = landmarks.nose[NOSE_TIP].x;
    let nose_height = (landmarks.nose[NOSE_BOTTOM].y - landmarks.nose[NOSE_TOP].y).abs();

    if nose_height == 0.0 || !nose_height.is_finite() {
        return Err(AngleError::Degenerate);
    }

    let angle = ((eye_mid_x - nose_x).abs() / nose_height).atan().to_degrees();
    if angle.is_finite() {
        Ok(angle)
    } else {
        Err(AngleError::Degenerate)
    }
}

fn require<T>(group: &[T], name: &'static str, needed: usize) -> Result<(), AngleError> {
    if group.len() < needed {
        return Err(AngleError::MissingLandmarks {
            group: name,
            needed,
            found: group.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::landmarks::Point;

    /// A face whose nose tip is `offset` pixels right of the eye midpoint and
    /// whose nose ridge is `height` pixels tall.
    #[allow(clippy::cast_precision_loss)]
    fn face(offset: f64, height: f64) -> FaceLandmarks {
        let nose = (0..9)
            .map(|i| Point::new(100.0 + offset, height * i as f64 / 6.0))
            .collect();
        let mut left_eye = vec![Point::new(60.0, 0.0); 6];
        left_eye[0] = Point::new(60.0, 0.0);
        let mut right_eye = vec![Point::new(140.0, 0.0); 6];
        right_eye[3] = Point::new(140.0, 0.0);

        FaceLandmarks {
            nose,
            left_eye,
            right_eye,
        }
    }

    #[test]
    fn test_centered_face_is_zero() {
        let angle = estimate_angle(&face(0.0, 60.0)).unwrap();
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn test_offset_equal_to_height_is_45() {
        let angle = estimate_angle(&face(60.0, 60.0)).unwrap();
        assert!((angle - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_direction_does_not_matter() {
        let left = estimate_angle(&face(-20.0, 60.0)).unwrap();
        let right = estimate_angle(&face(20.0, 60.0)).unwrap();
        assert!((left - right).abs() < 1e-9);
    }

    #[test]
    fn test_zero_nose_height_is_degenerate() {
        assert_eq!(estimate_angle(&face(10.0, 0.0)), Err(AngleError::Degenerate));
    }

    #[test]
    fn test_short_nose_group() {
        let mut landmarks = face(0.0, 60.0);
        landmarks.nose.truncate(5);
        assert_eq!(
            estimate_angle(&landmarks),
            Err(AngleError::MissingLandmarks {
                group: "nose",
                needed: 7,
                found: 5
            })
        );
    }

    #[test]
    fn test_short_eye_group() {
        let mut landmarks = face(0.0, 60.0);
        landmarks.right_eye.truncate(3);
        assert!(matches!(
            estimate_angle(&landmarks),
            Err(AngleError::MissingLandmarks { group: "right eye", .. })
        ));
    }

    #[test]
    fn test_non_finite_coordinates() {
        let mut landmarks = face(0.0, 60.0);
        landmarks.nose[6].y = f64::NAN;
        assert_eq!(estimate_angle(&landmarks), Err(AngleError::Degenerate));
    }
}
