//! Core types shared by the FRC vision detectors.
//!
//! This crate is intentionally small and free of any image-processing
//! backend. It holds the calibration store loaded from the robot's vision
//! settings file, the camera geometry supplied by the caller, and the plain
//! shape primitives the segmentation stage hands to the estimators.

mod calibration;
mod camera;
mod error;
mod logger;
mod params;
mod shape;

pub use calibration::{CalibrationSection, CalibrationStore, TargetClass};
pub use camera::CameraGeometry;
pub use error::{CalibrationKeyError, CalibrationLoadError, DetectError, KeyErrorKind, SegmentError};
pub use params::{BallParams, HsvBounds, TapeParams};
pub use shape::{BoundingBox, Circle, Contour, RotatedRect};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{
    init_from_env, init_to_dir, init_with_level, run_log_path, LoggerError, LOG_ENV_VAR,
};
