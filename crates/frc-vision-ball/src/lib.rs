//! Ball geometry estimator.
//!
//! Pipeline per frame:
//! 1. Segment the frame with the ball HSV bounds from the calibration store.
//! 2. Sort contours by enclosed area, largest first.
//! 3. Fit a minimum enclosing circle to each contour in that order and stop
//!    at the first one whose radius does not exceed `MINRADIUS`
//!    (see [`ScanPolicy`]).
//! 4. Convert each accepted circle into distance, bearing angle, lateral
//!    offset and screen fraction using the known ball radius.

mod detector;
mod types;

pub use detector::{measure_ball, BallDetector};
pub use types::{BallDetection, BallDetectionResult, ScanPolicy};
