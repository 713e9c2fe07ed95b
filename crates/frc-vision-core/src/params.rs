//! Typed views of the calibration sections consumed by the detectors.
//!
//! Each detector resolves its parameters from the store at the start of a
//! call, so a missing or malformed key fails the call before any pixel work.

use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationSection, CalibrationStore};
use crate::error::CalibrationKeyError;

/// Inclusive lower/upper thresholds on hue, saturation and value.
///
/// Channels use 8-bit OpenCV ranges: hue in `[0, 180)`, saturation and value
/// in `[0, 255]`. Bounds are kept as read so out-of-range calibration values
/// behave like saturating thresholds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HsvBounds {
    pub lower: [i64; 3],
    pub upper: [i64; 3],
}

impl HsvBounds {
    pub fn new(lower: [i64; 3], upper: [i64; 3]) -> Self {
        Self { lower, upper }
    }

    /// Read `HMIN..VMAX` from a section.
    pub fn from_section(section: &CalibrationSection) -> Result<Self, CalibrationKeyError> {
        Ok(Self {
            lower: [
                section.get_int("HMIN")?,
                section.get_int("SMIN")?,
                section.get_int("VMIN")?,
            ],
            upper: [
                section.get_int("HMAX")?,
                section.get_int("SMAX")?,
                section.get_int("VMAX")?,
            ],
        })
    }

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        hsv.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&c, (&lo, &hi))| (lo..=hi).contains(&i64::from(c)))
    }
}

/// Ball section: color bounds, minimum accepted radius, physical radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallParams {
    pub hsv: HsvBounds,
    /// Minimum enclosing-circle radius in pixels (`MINRADIUS`, integer).
    pub min_radius_px: f64,
    /// Physical ball radius in inches (`RADIUS`).
    pub radius_in: f64,
}

impl BallParams {
    pub fn from_store(store: &CalibrationStore) -> Result<Self, CalibrationKeyError> {
        let section = store.ball();
        Ok(Self {
            hsv: HsvBounds::from_section(section)?,
            min_radius_px: section.get_int("MINRADIUS")? as f64,
            radius_in: section.get_float("RADIUS")?,
        })
    }
}

/// Vision-tape section: color bounds, minimum area and physical constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TapeParams {
    pub hsv: HsvBounds,
    /// Minimum contour area in square pixels (`MINAREA`, integer).
    pub min_area_px: f64,
    /// Physical tape width in inches (`TAPEWIDTH`).
    pub tape_width_in: f64,
    /// Height of the goal above the floor in inches (`GOALHEIGHT`).
    pub goal_height_in: f64,
    /// Largest lateral offset in inches that still counts as locked.
    pub lock_tolerance_in: f64,
}

impl TapeParams {
    pub fn from_store(store: &CalibrationStore) -> Result<Self, CalibrationKeyError> {
        let section = store.vision_tape();
        Ok(Self {
            hsv: HsvBounds::from_section(section)?,
            min_area_px: section.get_int("MINAREA")? as f64,
            tape_width_in: section.get_float("TAPEWIDTH")?,
            goal_height_in: section.get_float("GOALHEIGHT")?,
            lock_tolerance_in: section.get_float("LOCKTOLERANCE")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyErrorKind, TargetClass};

    #[test]
    fn ball_params_resolve_every_key() {
        let store = CalibrationStore::parse(
            "BALL:\nHMIN,20\nHMAX,40\nSMIN,100\nSMAX,255\nVMIN,90\nVMAX,250\nMINRADIUS,4\nRADIUS,3.5\n",
        );
        let params = BallParams::from_store(&store).expect("ball params");
        assert_eq!(params.hsv.lower, [20, 100, 90]);
        assert_eq!(params.hsv.upper, [40, 255, 250]);
        assert_eq!(params.min_radius_px, 4.0);
        assert_eq!(params.radius_in, 3.5);
    }

    #[test]
    fn tape_params_fail_on_first_missing_key() {
        let store = CalibrationStore::parse(
            "VISIONTAPE:\nHMIN,60\nHMAX,90\nSMIN,150\nSMAX,255\nVMIN,120\nVMAX,255\nMINAREA,250\nTAPEWIDTH,39.25\nGOALHEIGHT,90\n",
        );
        let err = TapeParams::from_store(&store).unwrap_err();
        assert_eq!(err.section, TargetClass::VisionTape);
        assert_eq!(err.key, "LOCKTOLERANCE");
        assert_eq!(err.kind, KeyErrorKind::Missing);
    }

    #[test]
    fn hsv_bounds_are_inclusive() {
        let bounds = HsvBounds::new([10, 100, 100], [20, 255, 255]);
        assert!(bounds.contains([10, 100, 100]));
        assert!(bounds.contains([20, 255, 255]));
        assert!(!bounds.contains([9, 200, 200]));
        assert!(!bounds.contains([21, 200, 200]));
        assert!(!bounds.contains([15, 99, 200]));
    }
}
