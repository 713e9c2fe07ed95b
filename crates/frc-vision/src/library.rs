use std::path::{Path, PathBuf};
use std::sync::Arc;

use frc_vision_ball::{BallDetectionResult, BallDetector, ScanPolicy};
use frc_vision_core::{CalibrationStore, CameraGeometry, Contour, DetectError};
use frc_vision_segment::{SegmentParams, VisionBackend};
use frc_vision_tape::{TapeDetection, TapeDetector};
use image::RgbImage;
use log::info;
use parking_lot::RwLock;

use crate::VisionError;

/// Calibration store plus the detectors that read it.
///
/// Detection calls take an `Arc` snapshot of the store up front. Reloading
/// builds a complete new store and swaps the `Arc`, so a call in flight
/// keeps reading the store it started with.
pub struct VisionLibrary {
    calibration: RwLock<Arc<CalibrationStore>>,
    source: RwLock<Option<PathBuf>>,
    segment: SegmentParams,
    balls: BallDetector,
    tape: TapeDetector,
}

impl VisionLibrary {
    /// Load the calibration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VisionError> {
        let path = path.as_ref();
        let store = CalibrationStore::load(path)?;
        let library = Self::from_store(store);
        *library.source.write() = Some(path.to_path_buf());
        Ok(library)
    }

    /// Wrap an already-built store. [`reload`](Self::reload) then has no
    /// source to read until [`reload_from`](Self::reload_from) is used.
    pub fn from_store(store: CalibrationStore) -> Self {
        let segment = SegmentParams::default();
        Self {
            calibration: RwLock::new(Arc::new(store)),
            source: RwLock::new(None),
            segment,
            balls: BallDetector::new(segment),
            tape: TapeDetector::new(segment),
        }
    }

    pub fn with_segment_params(mut self, params: SegmentParams) -> Self {
        self.segment = params;
        self.balls = BallDetector::new(params).with_policy(self.balls.policy());
        self.tape = TapeDetector::new(params);
        self
    }

    pub fn with_scan_policy(mut self, policy: ScanPolicy) -> Self {
        self.balls = BallDetector::new(self.segment).with_policy(policy);
        self
    }

    pub fn segment_params(&self) -> &SegmentParams {
        &self.segment
    }

    /// Snapshot of the current calibration.
    pub fn calibration(&self) -> Arc<CalibrationStore> {
        Arc::clone(&self.calibration.read())
    }

    /// File the current calibration was loaded from, if any.
    pub fn source(&self) -> Option<PathBuf> {
        self.source.read().clone()
    }

    /// Swap in `store` as the current calibration.
    pub fn replace(&self, store: CalibrationStore) {
        *self.calibration.write() = Arc::new(store);
    }

    /// Re-read the file the calibration came from.
    pub fn reload(&self) -> Result<(), VisionError> {
        let path = self.source().ok_or(VisionError::NoCalibrationSource)?;
        self.reload_from(path)
    }

    /// Load `path` and swap it in. On error the current calibration stays.
    pub fn reload_from(&self, path: impl AsRef<Path>) -> Result<(), VisionError> {
        let path = path.as_ref();
        let store = CalibrationStore::load(path)?;
        self.replace(store);
        *self.source.write() = Some(path.to_path_buf());
        info!("calibration reloaded from {}", path.display());
        Ok(())
    }

    pub fn detect_balls(
        &self,
        frame: &RgbImage,
        camera: &CameraGeometry,
    ) -> Result<BallDetectionResult, VisionError> {
        let calibration = self.calibration();
        Ok(self.balls.detect(frame, &calibration, camera)?)
    }

    pub fn detect_tape(
        &self,
        frame: &RgbImage,
        camera: &CameraGeometry,
    ) -> Result<TapeDetection, VisionError> {
        let calibration = self.calibration();
        Ok(self.tape.detect(frame, &calibration, camera)?)
    }

    /// Tape detection on contours from the edge variant instead of color.
    pub fn detect_tape_from_edges(
        &self,
        frame: &RgbImage,
        camera: &CameraGeometry,
    ) -> Result<TapeDetection, VisionError> {
        let calibration = self.calibration();
        let contours = self.segment_edges(frame)?;
        Ok(self.tape.detect_with_contours(&contours, &calibration, camera)?)
    }

    pub fn segment_edges(&self, frame: &RgbImage) -> Result<Vec<Contour>, VisionError> {
        let contours = self.tape.backend().segment_edges(frame).map_err(DetectError::from)?;
        Ok(contours)
    }
}
