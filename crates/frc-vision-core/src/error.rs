use std::path::PathBuf;

use crate::calibration::TargetClass;

/// Failure to read a calibration source. No partial store is ever produced.
#[derive(thiserror::Error, Debug)]
pub enum CalibrationLoadError {
    #[error("cannot read calibration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a calibration key could not be used.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum KeyErrorKind {
    #[error("key is missing")]
    Missing,
    #[error("expected {expected}, found {value:?}")]
    Malformed {
        value: String,
        expected: &'static str,
    },
}

/// A detection needed a key that is absent from, or not numeric in, the store.
///
/// This fails the one detection call that asked for the key; the store itself
/// stays valid.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("calibration {section}.{key}: {kind}")]
pub struct CalibrationKeyError {
    pub section: TargetClass,
    pub key: String,
    pub kind: KeyErrorKind,
}

/// Errors returned by the segmentation stage.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum SegmentError {
    #[error("frame has no pixels (width={width}, height={height})")]
    EmptyFrame { width: u32, height: u32 },
}

/// Errors a detector can return. Degenerate geometry is never one of them:
/// it shows up as sentinel values in the detection instead.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum DetectError {
    #[error(transparent)]
    Calibration(#[from] CalibrationKeyError),
    #[error(transparent)]
    Segment(#[from] SegmentError),
}
