use serde::{Deserialize, Serialize};

/// Tuning for the segmentation pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    /// Gaussian blur sigma in pixels. `0` disables the blur.
    ///
    /// The default matches the sigma OpenCV derives for a 13x13 kernel.
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold (edge variant only).
    pub canny_low: f32,
    /// Canny hysteresis high threshold (edge variant only).
    pub canny_high: f32,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            blur_sigma: 2.3,
            canny_low: 35.0,
            canny_high: 125.0,
        }
    }
}
