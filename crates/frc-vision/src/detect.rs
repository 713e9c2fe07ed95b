//! End-to-end helpers from image files and raw buffers.

use std::path::Path;

use frc_vision_ball::{BallDetectionResult, BallDetector};
use frc_vision_core::{CalibrationStore, CameraGeometry};
use frc_vision_tape::{TapeDetection, TapeDetector};
use image::{ImageReader, RgbImage};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::VisionError;

/// Decode an image file into an RGB frame.
pub fn load_frame(path: impl AsRef<Path>) -> Result<RgbImage, VisionError> {
    Ok(ImageReader::open(path)?.decode()?.to_rgb8())
}

/// Build an `image::RgbImage` from a raw interleaved RGB buffer.
pub fn rgb_image_from_slice(width: u32, height: u32, pixels: &[u8]) -> Result<RgbImage, VisionError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(VisionError::InvalidRgbDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h).and_then(|n| n.checked_mul(3)) else {
        return Err(VisionError::InvalidRgbDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(VisionError::InvalidRgbBuffer {
            expected,
            got: pixels.len(),
        });
    }
    RgbImage::from_raw(width, height, pixels.to_vec())
        .ok_or(VisionError::InvalidRgbDimensions { width, height })
}

/// Run the default ball detector.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(frame, calibration), fields(width = frame.width(), height = frame.height()))
)]
pub fn detect_balls(
    frame: &RgbImage,
    calibration: &CalibrationStore,
    camera: &CameraGeometry,
) -> Result<BallDetectionResult, VisionError> {
    Ok(BallDetector::default().detect(frame, calibration, camera)?)
}

/// Run the default tape detector.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(frame, calibration), fields(width = frame.width(), height = frame.height()))
)]
pub fn detect_tape(
    frame: &RgbImage,
    calibration: &CalibrationStore,
    camera: &CameraGeometry,
) -> Result<TapeDetection, VisionError> {
    Ok(TapeDetector::default().detect(frame, calibration, camera)?)
}

pub fn detect_balls_from_rgb_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    calibration: &CalibrationStore,
    camera: &CameraGeometry,
) -> Result<BallDetectionResult, VisionError> {
    let frame = rgb_image_from_slice(width, height, pixels)?;
    detect_balls(&frame, calibration, camera)
}

pub fn detect_tape_from_rgb_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    calibration: &CalibrationStore,
    camera: &CameraGeometry,
) -> Result<TapeDetection, VisionError> {
    let frame = rgb_image_from_slice(width, height, pixels)?;
    detect_tape(&frame, calibration, camera)
}
