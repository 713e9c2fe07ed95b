//! JSON run configuration and report helpers.

use std::{
    fs,
    path::{Path, PathBuf},
};

use frc_vision_ball::{BallDetectionResult, ScanPolicy};
use frc_vision_core::CameraGeometry;
use frc_vision_segment::SegmentParams;
use frc_vision_tape::TapeDetection;
use serde::{Deserialize, Serialize};

use crate::{VisionError, VisionLibrary};

/// Which estimators a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSelection {
    pub balls: bool,
    pub tape: bool,
    /// Feed the tape estimator edge contours instead of color contours.
    pub tape_from_edges: bool,
}

impl Default for TargetSelection {
    fn default() -> Self {
        Self {
            balls: true,
            tape: true,
            tape_from_edges: false,
        }
    }
}

/// Configuration for one detection run over a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionRunConfig {
    pub image_path: String,
    pub calibration_path: String,
    pub camera: CameraGeometry,
    #[serde(default)]
    pub segment: SegmentParams,
    #[serde(default)]
    pub scan_policy: ScanPolicy,
    #[serde(default)]
    pub targets: TargetSelection,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub overlay_path: Option<String>,
}

impl VisionRunConfig {
    pub fn new(
        image_path: impl Into<String>,
        calibration_path: impl Into<String>,
        camera: CameraGeometry,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            calibration_path: calibration_path.into(),
            camera,
            segment: SegmentParams::default(),
            scan_policy: ScanPolicy::default(),
            targets: TargetSelection::default(),
            output_path: None,
            overlay_path: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, VisionError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), VisionError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("frc_vision_report.json"))
    }

    pub fn overlay_path(&self) -> Option<PathBuf> {
        self.overlay_path.as_ref().map(PathBuf::from)
    }

    /// Load the calibration and build a library with this config's tuning.
    pub fn build_library(&self) -> Result<VisionLibrary, VisionError> {
        Ok(VisionLibrary::load(&self.calibration_path)?
            .with_segment_params(self.segment)
            .with_scan_policy(self.scan_policy))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingsMs {
    pub load_image: u64,
    pub detect_balls: u64,
    pub detect_tape: u64,
    pub total: u64,
}

/// Result of one run, written as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionReport {
    pub config_path: String,
    pub image_path: String,
    pub width: u32,
    pub height: u32,
    pub camera: CameraGeometry,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub balls: Option<BallDetectionResult>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tape: Option<TapeDetection>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overlay_path: Option<String>,
    pub timings_ms: TimingsMs,
}

impl VisionReport {
    pub fn new(cfg: &VisionRunConfig, config_path: &Path, width: u32, height: u32) -> Self {
        Self {
            config_path: config_path.to_string_lossy().into_owned(),
            image_path: cfg.image_path.clone(),
            width,
            height,
            camera: cfg.camera,
            balls: None,
            tape: None,
            errors: Vec::new(),
            overlay_path: None,
            timings_ms: TimingsMs::default(),
        }
    }

    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.errors.push(err.to_string());
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, VisionError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), VisionError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
