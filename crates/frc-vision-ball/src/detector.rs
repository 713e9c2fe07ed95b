use std::cmp::Ordering;
use std::f64::consts::PI;

use frc_vision_core::{BallParams, CalibrationStore, CameraGeometry, Circle, Contour, DetectError};
use frc_vision_segment::{ImageprocBackend, SegmentParams, VisionBackend};
use image::RgbImage;
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::types::{BallDetection, BallDetectionResult, ScanPolicy};

/// Detects balls of the calibrated color and estimates their position.
pub struct BallDetector<B = ImageprocBackend> {
    backend: B,
    policy: ScanPolicy,
}

impl Default for BallDetector<ImageprocBackend> {
    fn default() -> Self {
        Self::new(SegmentParams::default())
    }
}

impl BallDetector<ImageprocBackend> {
    pub fn new(params: SegmentParams) -> Self {
        Self::with_backend(ImageprocBackend::new(params))
    }
}

impl<B: VisionBackend> BallDetector<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            policy: ScanPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn policy(&self) -> ScanPolicy {
        self.policy
    }

    /// Segment `frame` with the ball calibration and estimate every accepted
    /// ball. Fails only when a ball calibration key is missing or malformed,
    /// or the frame is empty.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame, calibration), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn detect(
        &self,
        frame: &RgbImage,
        calibration: &CalibrationStore,
        camera: &CameraGeometry,
    ) -> Result<BallDetectionResult, DetectError> {
        let params = BallParams::from_store(calibration)?;
        let contours = self.backend.segment_color(frame, &params.hsv)?;
        Ok(self.estimate(contours, &params, camera))
    }

    /// Estimate balls from already segmented contours.
    pub fn estimate(
        &self,
        contours: Vec<Contour>,
        params: &BallParams,
        camera: &CameraGeometry,
    ) -> BallDetectionResult {
        if contours.is_empty() {
            return BallDetectionResult::default();
        }

        let mut by_area: Vec<(f64, Contour)> = contours
            .into_iter()
            .map(|c| (self.backend.contour_area(&c), c))
            .collect();
        // Stable, so equal areas keep segmentation order.
        by_area.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let mut balls = Vec::new();
        for (area, contour) in &by_area {
            let circle = self.backend.min_enclosing_circle(contour);
            if circle.radius <= params.min_radius_px {
                match self.policy {
                    ScanPolicy::StopAtFirstUndersized => {
                        debug!(
                            "ball scan stopped at area {area:.1}: radius {:.2} <= {}",
                            circle.radius, params.min_radius_px
                        );
                        break;
                    }
                    ScanPolicy::SkipUndersized => continue,
                }
            }
            balls.push(measure_ball(&circle, params, camera));
        }

        BallDetectionResult::new(balls)
    }
}

/// Convert an enclosing circle into physical measurements.
///
/// Range uses the known ball radius as a pixel scale:
/// `distance = (R / r) * W / (2 tan(fov))`.
pub fn measure_ball(circle: &Circle, params: &BallParams, camera: &CameraGeometry) -> BallDetection {
    let inches_per_pixel = params.radius_in / circle.radius;
    let distance =
        inches_per_pixel * camera.width_px / (2.0 * camera.fov_deg.to_radians().tan());
    let offset_in = inches_per_pixel * (circle.center.x - camera.center_x());
    let angle = (offset_in / distance).atan().to_degrees();
    let screen_percent = PI * circle.radius * circle.radius / camera.area_px();

    BallDetection {
        center: circle.center,
        radius: circle.radius,
        distance,
        angle,
        offset: -offset_in,
        screen_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use frc_vision_core::{BoundingBox, HsvBounds, KeyErrorKind, RotatedRect, SegmentError};
    use nalgebra::Point2;

    /// Backend whose shape fits are looked up by the contour's first x coordinate.
    struct ScriptedBackend {
        contours: Vec<Contour>,
        areas: Vec<f64>,
        circles: Vec<Circle>,
    }

    impl ScriptedBackend {
        fn new(shapes: &[(f64, Circle)]) -> Self {
            Self {
                contours: (0..shapes.len() as i32).map(|i| [(i, 0)].into_iter().collect()).collect(),
                areas: shapes.iter().map(|s| s.0).collect(),
                circles: shapes.iter().map(|s| s.1).collect(),
            }
        }

        fn index(contour: &Contour) -> usize {
            contour.points[0].x as usize
        }
    }

    impl VisionBackend for ScriptedBackend {
        fn segment_color(&self, _: &RgbImage, _: &HsvBounds) -> Result<Vec<Contour>, SegmentError> {
            Ok(self.contours.clone())
        }

        fn segment_edges(&self, _: &RgbImage) -> Result<Vec<Contour>, SegmentError> {
            Ok(self.contours.clone())
        }

        fn contour_area(&self, contour: &Contour) -> f64 {
            self.areas[Self::index(contour)]
        }

        fn min_enclosing_circle(&self, contour: &Contour) -> Circle {
            self.circles[Self::index(contour)]
        }

        fn bounding_rect(&self, _: &Contour) -> BoundingBox {
            BoundingBox::default()
        }

        fn min_area_rect(&self, _: &Contour) -> RotatedRect {
            RotatedRect::new(Point2::origin(), [0.0, 0.0], 0.0)
        }
    }

    const SETTINGS: &str = "BALL:\nHMIN,20\nHMAX,40\nSMIN,100\nSMAX,255\nVMIN,100\nVMAX,255\nMINRADIUS,4\nRADIUS,3.5\n";

    fn camera() -> CameraGeometry {
        CameraGeometry::new(320.0, 240.0, 30.0)
    }

    fn circle(x: f64, y: f64, r: f64) -> Circle {
        Circle::new(Point2::new(x, y), r)
    }

    fn frame() -> RgbImage {
        RgbImage::new(320, 240)
    }

    #[test]
    fn no_contours_yields_empty_result() {
        let detector = BallDetector::with_backend(ScriptedBackend::new(&[]));
        let store = CalibrationStore::parse(SETTINGS);
        let res = detector.detect(&frame(), &store, &camera()).expect("detect");
        assert_eq!(res, BallDetectionResult::default());
        assert_eq!(res.count, 0);
    }

    #[test]
    fn centered_ball_at_known_radius() {
        let detector = BallDetector::with_backend(ScriptedBackend::new(&[(
            50.0,
            circle(160.0, 120.0, 3.5),
        )]));
        let store = CalibrationStore::parse(&SETTINGS.replace("MINRADIUS,4", "MINRADIUS,2"));
        let cam = camera();
        let res = detector.detect(&frame(), &store, &cam).expect("detect");

        assert_eq!(res.count, 1);
        let ball = res.balls[0];
        assert_eq!(ball.radius, 3.5);
        let expected = cam.width_px / (2.0 * cam.fov_deg.to_radians().tan());
        assert_relative_eq!(ball.distance, expected, max_relative = 1e-12);
        assert_eq!(ball.angle, 0.0);
        assert_eq!(ball.offset, 0.0);
        assert_relative_eq!(ball.screen_percent, PI * 3.5 * 3.5 / (320.0 * 240.0));
    }

    #[test]
    fn known_radius_at_or_below_minimum_is_never_ranged() {
        // RADIUS 3.5 against MINRADIUS 4: a ball imaged at its calibrated
        // radius is rejected before any estimate is made.
        let detector = BallDetector::with_backend(ScriptedBackend::new(&[(
            50.0,
            circle(160.0, 120.0, 3.5),
        )]));
        let store = CalibrationStore::parse(SETTINGS);
        let res = detector.detect(&frame(), &store, &camera()).expect("detect");
        assert!(res.is_empty());
    }

    #[test]
    fn scan_stops_at_first_undersized_contour() {
        // Listed out of area order to exercise the sort.
        let detector = BallDetector::with_backend(ScriptedBackend::new(&[
            (60.0, circle(40.0, 40.0, 9.0)),
            (100.0, circle(100.0, 40.0, 5.0)),
            (80.0, circle(200.0, 40.0, 2.0)),
        ]));
        let store = CalibrationStore::parse(SETTINGS);
        let res = detector.detect(&frame(), &store, &camera()).expect("detect");

        assert_eq!(res.count, 1);
        assert_eq!(res.balls[0].radius, 5.0);
        assert_eq!(res.balls[0].center.x, 100.0);
    }

    #[test]
    fn skip_policy_examines_every_contour() {
        let detector = BallDetector::with_backend(ScriptedBackend::new(&[
            (60.0, circle(40.0, 40.0, 9.0)),
            (100.0, circle(100.0, 40.0, 5.0)),
            (80.0, circle(200.0, 40.0, 2.0)),
        ]))
        .with_policy(ScanPolicy::SkipUndersized);
        let store = CalibrationStore::parse(SETTINGS);
        let res = detector.detect(&frame(), &store, &camera()).expect("detect");

        let radii: Vec<f64> = res.balls.iter().map(|b| b.radius).collect();
        assert_eq!(radii, vec![5.0, 9.0]);
    }

    #[test]
    fn radius_equal_to_minimum_is_rejected() {
        let detector =
            BallDetector::with_backend(ScriptedBackend::new(&[(50.0, circle(10.0, 10.0, 4.0))]));
        let store = CalibrationStore::parse(SETTINGS);
        let res = detector.detect(&frame(), &store, &camera()).expect("detect");
        assert!(res.is_empty());
    }

    #[test]
    fn offset_and_angle_signs_follow_image_side() {
        let params = BallParams::from_store(&CalibrationStore::parse(SETTINGS)).expect("params");
        let cam = camera();

        let right = measure_ball(&circle(260.0, 120.0, 7.0), &params, &cam);
        assert!(right.angle > 0.0);
        assert!(right.offset < 0.0);
        assert_relative_eq!(right.offset, -0.5 * 100.0);

        let left = measure_ball(&circle(60.0, 120.0, 7.0), &params, &cam);
        assert!(left.angle < 0.0);
        assert_relative_eq!(left.offset, 50.0);
        assert_relative_eq!(left.angle, -right.angle);
    }

    #[test]
    fn missing_key_fails_the_call() {
        let detector =
            BallDetector::with_backend(ScriptedBackend::new(&[(50.0, circle(10.0, 10.0, 8.0))]));
        let store = CalibrationStore::parse("BALL:\nHMIN,20\nHMAX,40\nSMIN,100\nSMAX,255\nVMIN,100\nVMAX,255\nMINRADIUS,4\n");
        let err = detector.detect(&frame(), &store, &camera()).unwrap_err();
        let DetectError::Calibration(key) = err else {
            panic!("expected calibration error, got {err:?}");
        };
        assert_eq!(key.key, "RADIUS");
        assert_eq!(key.kind, KeyErrorKind::Missing);
    }

    #[test]
    fn detection_serializes_with_named_fields() {
        let params = BallParams::from_store(&CalibrationStore::parse(SETTINGS)).expect("params");
        let ball = measure_ball(&circle(160.0, 120.0, 7.0), &params, &camera());
        let json = serde_json::to_value(BallDetectionResult::new(vec![ball])).expect("json");
        assert_eq!(json["count"], 1);
        assert!(json["balls"][0]["distance"].is_number());
        assert!(json["balls"][0]["screen_percent"].is_number());
    }
}
