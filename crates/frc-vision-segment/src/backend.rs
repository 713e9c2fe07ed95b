//! Image-processing capability surface used by the detectors.

use frc_vision_core::{BoundingBox, Circle, Contour, HsvBounds, RotatedRect, SegmentError};
use image::RgbImage;

use crate::fit;
use crate::params::SegmentParams;
use crate::segment;

/// Pixel-level operations the estimators rely on.
///
/// Estimators never touch pixels or contour points themselves; swapping the
/// backend (or faking it in tests) changes nothing else.
pub trait VisionBackend {
    /// Contours of pixels whose HSV value lies within `bounds`.
    fn segment_color(&self, frame: &RgbImage, bounds: &HsvBounds) -> Result<Vec<Contour>, SegmentError>;

    /// Contours traced from an edge map, for targets with unreliable color.
    fn segment_edges(&self, frame: &RgbImage) -> Result<Vec<Contour>, SegmentError>;

    fn contour_area(&self, contour: &Contour) -> f64;

    fn min_enclosing_circle(&self, contour: &Contour) -> Circle;

    fn bounding_rect(&self, contour: &Contour) -> BoundingBox;

    fn min_area_rect(&self, contour: &Contour) -> RotatedRect;
}

/// Default backend built on `image` and `imageproc`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImageprocBackend {
    params: SegmentParams,
}

impl ImageprocBackend {
    pub fn new(params: SegmentParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SegmentParams {
        &self.params
    }
}

impl VisionBackend for ImageprocBackend {
    fn segment_color(&self, frame: &RgbImage, bounds: &HsvBounds) -> Result<Vec<Contour>, SegmentError> {
        segment::segment_color(frame, bounds, &self.params)
    }

    fn segment_edges(&self, frame: &RgbImage) -> Result<Vec<Contour>, SegmentError> {
        segment::segment_edges(frame, &self.params)
    }

    fn contour_area(&self, contour: &Contour) -> f64 {
        fit::contour_area(contour)
    }

    fn min_enclosing_circle(&self, contour: &Contour) -> Circle {
        fit::min_enclosing_circle(contour)
    }

    fn bounding_rect(&self, contour: &Contour) -> BoundingBox {
        fit::bounding_rect(contour)
    }

    fn min_area_rect(&self, contour: &Contour) -> RotatedRect {
        fit::min_area_rect(contour)
    }
}
