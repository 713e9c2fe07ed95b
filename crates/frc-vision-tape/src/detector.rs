use frc_vision_core::{
    CalibrationStore, CameraGeometry, Contour, DetectError, RotatedRect, TapeParams,
};
use frc_vision_segment::{ImageprocBackend, SegmentParams, VisionBackend};
use image::RgbImage;
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::result::{TapeCameraValues, TapeDetection, TapeRealWorldValues, SENTINEL};

/// Camera angle to the tape plane, from a rotated rectangle in `(-90, 0]`.
///
/// Angles under 45 degrees in magnitude are taken as-is; larger ones mean the
/// rectangle's width ran along the other side, so the complement is used.
#[inline]
pub fn camera_angle_from_rect(rect: &RotatedRect) -> f64 {
    let a = rect.angle.abs();
    if a < 45.0 {
        a
    } else {
        90.0 - a
    }
}

/// Finds the largest tape contour and converts it into range, bearing and lock.
pub struct TapeDetector<B = ImageprocBackend> {
    backend: B,
}

impl Default for TapeDetector<ImageprocBackend> {
    fn default() -> Self {
        Self::new(SegmentParams::default())
    }
}

impl TapeDetector<ImageprocBackend> {
    pub fn new(params: SegmentParams) -> Self {
        Self::with_backend(ImageprocBackend::new(params))
    }
}

impl<B: VisionBackend> TapeDetector<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Color-segment `frame` with the tape calibration and evaluate the
    /// largest contour.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame, calibration), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn detect(
        &self,
        frame: &RgbImage,
        calibration: &CalibrationStore,
        camera: &CameraGeometry,
    ) -> Result<TapeDetection, DetectError> {
        let params = TapeParams::from_store(calibration)?;
        let contours = self.backend.segment_color(frame, &params.hsv)?;
        Ok(self.evaluate(&contours, &params, camera))
    }

    /// Evaluate contours from any source, e.g. the edge segmentation variant.
    pub fn detect_with_contours(
        &self,
        contours: &[Contour],
        calibration: &CalibrationStore,
        camera: &CameraGeometry,
    ) -> Result<TapeDetection, DetectError> {
        let params = TapeParams::from_store(calibration)?;
        Ok(self.evaluate(contours, &params, camera))
    }

    pub fn evaluate(
        &self,
        contours: &[Contour],
        params: &TapeParams,
        camera: &CameraGeometry,
    ) -> TapeDetection {
        let mut out = TapeDetection::not_found();

        // First maximum wins on ties.
        let largest = contours.iter().fold(None, |best: Option<(f64, &Contour)>, c| {
            let area = self.backend.contour_area(c);
            match best {
                Some((best_area, _)) if area <= best_area => best,
                _ => Some((area, c)),
            }
        });
        let Some((area, contour)) = largest else {
            return out;
        };
        if area <= params.min_area_px {
            debug!("largest tape contour area {area:.1} <= {}", params.min_area_px);
            return out;
        }

        let bbox = self.backend.bounding_rect(contour);
        if bbox.is_empty() {
            debug!("tape contour has an empty bounding box: {bbox:?}");
            return out;
        }
        let rect = self.backend.min_area_rect(contour);
        let camera_angle = camera_angle_from_rect(&rect);
        let bot_angle = 2.0 * camera_angle;

        let (x, y) = (f64::from(bbox.x), f64::from(bbox.y));
        let (w, h) = (f64::from(bbox.width), f64::from(bbox.height));

        let apparent_width = params.tape_width_in * bot_angle.to_radians().cos();
        let inches_per_pixel = apparent_width / w;

        let horiz_offset_px = (x + w / 2.0) - camera.center_x();
        let horiz_offset_in = inches_per_pixel * horiz_offset_px;
        let vert_offset_px = camera.center_y() - (y - h / 2.0);
        let vert_offset_in = inches_per_pixel * vert_offset_px;

        let straight_distance = apparent_width * camera.focal_length_px / w;
        let rise = params.goal_height_in - camera.mount_height_in;
        let distance_arg = straight_distance * straight_distance - rise * rise;
        let tape_distance = if distance_arg > 0.0 {
            distance_arg.sqrt()
        } else {
            debug!("tape distance argument {distance_arg:.2} is not positive");
            SENTINEL
        };
        let wall_distance = tape_distance / bot_angle.to_radians().cos();

        out.camera = TapeCameraValues {
            x,
            y,
            width: w,
            height: h,
            inches_per_pixel,
            offset_px: horiz_offset_px,
        };
        out.real_world = TapeRealWorldValues {
            aspect_ratio: bbox.aspect_ratio(),
            center_offset: -horiz_offset_in,
            straight_distance,
            tape_distance,
            wall_distance,
            horizontal_angle: (horiz_offset_in / tape_distance).atan().to_degrees(),
            vertical_angle: (vert_offset_in / tape_distance).atan().to_degrees(),
            target_rotation: camera_angle,
            bot_angle,
            apparent_width,
            vertical_offset: vert_offset_in,
        };
        out.found = true;
        out.locked = horiz_offset_in.abs() <= params.lock_tolerance_in;
        out.rotated_rect = Some(rect);
        out.box_points = Some(rect.box_points());
        out
    }
}
