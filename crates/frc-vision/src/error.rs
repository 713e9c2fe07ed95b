use frc_vision_core::{CalibrationLoadError, DetectError};

/// Errors produced by the facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum VisionError {
    #[error(transparent)]
    Calibration(#[from] CalibrationLoadError),

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error("no calibration file to reload from")]
    NoCalibrationSource,

    #[error("invalid RGB buffer length (expected {expected} bytes, got {got})")]
    InvalidRgbBuffer { expected: usize, got: usize },

    #[error("invalid RGB image dimensions (width={width}, height={height})")]
    InvalidRgbDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
