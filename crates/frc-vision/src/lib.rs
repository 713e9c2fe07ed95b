//! High-level facade crate for the `frc-vision-*` workspace.
//!
//! This crate provides:
//! - re-exports of the calibration, segmentation and estimator crates,
//! - [`VisionLibrary`], which owns the calibration store and runs the
//!   detectors against it, with copy-and-swap reload,
//! - end-to-end helpers from `image` buffers ([`detect`]),
//! - JSON run configuration and reports ([`io`]), and overlay drawing
//!   ([`overlay`]).
//!
//! ## Quickstart
//!
//! ```no_run
//! use frc_vision::{CameraGeometry, VisionLibrary};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let library = VisionLibrary::load("vision_settings.txt")?;
//! let frame = frc_vision::detect::load_frame("frame.png")?;
//! let camera = CameraGeometry::new(320.0, 240.0, 30.0).with_focal_length(340.0);
//!
//! let balls = library.detect_balls(&frame, &camera)?;
//! let tape = library.detect_tape(&frame, &camera)?;
//! println!("{} balls, tape locked: {}", balls.count, tape.locked);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `frc_vision::core`: calibration store, camera geometry, shapes, logging.
//! - `frc_vision::segment`: color/edge segmentation and the backend trait.
//! - `frc_vision::ball`: ball ranging.
//! - `frc_vision::tape`: tape ranging and lock.
//! - `frc_vision::orientation`: background AHRS poller.

pub use frc_vision_ball as ball;
pub use frc_vision_core as core;
pub use frc_vision_orientation as orientation;
pub use frc_vision_segment as segment;
pub use frc_vision_tape as tape;

pub use frc_vision_ball::{BallDetection, BallDetectionResult, BallDetector, ScanPolicy};
pub use frc_vision_core::{CalibrationStore, CameraGeometry, TargetClass};
pub use frc_vision_segment::SegmentParams;
pub use frc_vision_tape::{TapeDetection, TapeDetector};

mod error;
mod library;

pub mod detect;
pub mod io;
pub mod overlay;

pub use error::VisionError;
pub use library::VisionLibrary;
