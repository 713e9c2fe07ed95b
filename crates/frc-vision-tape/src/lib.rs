//! Tape Geometry Estimator.
//!
//! Only the largest qualifying contour is evaluated. Its axis-aligned box
//! gives the pixel scale, and its minimum-area rectangle gives the viewing
//! angle used to correct for foreshortening:
//!
//! - `botAngle = 2 * cameraAngle`,
//! - `apparentWidth = TAPEWIDTH * cos(botAngle)`,
//! - `straightDistance = apparentWidth * focalLength / boxWidth`,
//! - `tapeDistance = sqrt(straight² - (GOALHEIGHT - mountHeight)²)`.
//!
//! When nothing qualifies, or the geometry is inconsistent, fields keep the
//! sentinel values of [`TapeDetection::default`].

mod detector;
mod result;

pub use detector::{camera_angle_from_rect, TapeDetector};
pub use result::{TapeCameraValues, TapeDetection, TapeRealWorldValues, SENTINEL};
