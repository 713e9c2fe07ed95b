use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// How the area-sorted contour scan treats a contour below `MINRADIUS`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPolicy {
    /// End the scan at the first undersized contour. Smaller-area contours
    /// after it are never examined, even if their circle would qualify.
    #[default]
    StopAtFirstUndersized,
    /// Skip undersized contours and keep scanning.
    SkipUndersized,
}

/// One accepted ball.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallDetection {
    /// Enclosing-circle center in pixels.
    pub center: Point2<f64>,
    /// Enclosing-circle radius in pixels.
    pub radius: f64,
    /// Range to the ball in inches.
    pub distance: f64,
    /// Signed bearing in degrees; positive when the ball is right of center.
    pub angle: f64,
    /// Signed lateral offset in inches; positive when the ball is left of center.
    pub offset: f64,
    /// Fraction of the frame covered by the enclosing circle.
    pub screen_percent: f64,
}

/// Accepted balls, largest contour area first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BallDetectionResult {
    pub count: usize,
    pub balls: Vec<BallDetection>,
}

impl BallDetectionResult {
    pub fn new(balls: Vec<BallDetection>) -> Self {
        Self {
            count: balls.len(),
            balls,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Ball with the largest contour area, if any.
    pub fn largest(&self) -> Option<&BallDetection> {
        self.balls.first()
    }
}
