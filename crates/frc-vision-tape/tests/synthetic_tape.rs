use frc_vision_core::{CalibrationStore, CameraGeometry};
use frc_vision_tape::{TapeDetection, TapeDetector};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

const SETTINGS: &str = "\
visiontape:
HMIN,50
HMAX,70
SMIN,100
SMAX,255
VMIN,80
VMAX,255
MINAREA,100
TAPEWIDTH,10
GOALHEIGHT,90
LOCKTOLERANCE,1.5
";

const TAPE: Rgb<u8> = Rgb([20, 200, 20]);

fn camera() -> CameraGeometry {
    CameraGeometry::new(640.0, 480.0, 30.0)
        .with_focal_length(600.0)
        .with_mount(20.0, 18.0)
}

fn background() -> RgbImage {
    RgbImage::from_pixel(640, 480, Rgb([30, 30, 30]))
}

fn detect(frame: &RgbImage) -> TapeDetection {
    let store = CalibrationStore::parse(SETTINGS);
    TapeDetector::default()
        .detect(frame, &store, &camera())
        .expect("detect")
}

#[test]
fn centered_strip_is_found_and_locked() {
    let mut frame = background();
    draw_filled_rect_mut(&mut frame, Rect::at(300, 230).of_size(40, 20), TAPE);

    let det = detect(&frame);
    assert!(det.found);
    assert!(det.locked, "offset {}", det.real_world.center_offset);
    assert!((det.camera.width - 40.0).abs() <= 2.0, "width {}", det.camera.width);
    assert!(det.real_world.target_rotation < 2.0);
    assert!((det.real_world.aspect_ratio - 2.0).abs() < 0.25);

    let straight = det.real_world.straight_distance;
    assert!((straight - 150.0).abs() < 15.0, "straight {straight}");
    assert!(det.real_world.tape_distance < straight);
    assert!(det.box_points.is_some());
}

#[test]
fn strip_off_to_the_right_is_not_locked() {
    let mut frame = background();
    draw_filled_rect_mut(&mut frame, Rect::at(480, 230).of_size(40, 20), TAPE);

    let det = detect(&frame);
    assert!(det.found);
    assert!(!det.locked);
    assert!(det.camera.offset_px > 150.0);
    assert!(det.real_world.center_offset < 0.0);
    assert!(det.real_world.horizontal_angle > 0.0);
}

#[test]
fn tilted_strip_reports_its_rotation() {
    let mut frame = background();
    let (cx, cy) = (320.0f64, 240.0f64);
    let (half_w, half_h) = (40.0f64, 12.0f64);
    let (sin, cos) = 30f64.to_radians().sin_cos();
    let corners: Vec<Point<i32>> = [(-half_w, -half_h), (half_w, -half_h), (half_w, half_h), (-half_w, half_h)]
        .iter()
        .map(|&(dx, dy)| {
            Point::new(
                (cx + dx * cos - dy * sin).round() as i32,
                (cy + dx * sin + dy * cos).round() as i32,
            )
        })
        .collect();
    draw_polygon_mut(&mut frame, &corners, TAPE);

    let det = detect(&frame);
    assert!(det.found);
    let rotation = det.real_world.target_rotation;
    assert!((rotation - 30.0).abs() < 3.0, "rotation {rotation}");
    assert!((det.real_world.bot_angle - 2.0 * rotation).abs() < 1e-9);
    assert!(det.real_world.apparent_width < 10.0);
}

#[test]
fn small_speck_is_below_minimum_area() {
    let mut frame = background();
    draw_filled_rect_mut(&mut frame, Rect::at(100, 100).of_size(6, 6), TAPE);

    let det = detect(&frame);
    assert_eq!(det, TapeDetection::not_found());
}
