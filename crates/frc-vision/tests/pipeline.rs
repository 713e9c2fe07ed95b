use frc_vision::core::TargetClass;
use frc_vision::{overlay, CalibrationStore, CameraGeometry, ScanPolicy, VisionLibrary};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

const SETTINGS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/vision_settings.txt");

const BALL: Rgb<u8> = Rgb([230, 200, 20]);
const TAPE: Rgb<u8> = Rgb([20, 200, 20]);

fn camera() -> CameraGeometry {
    CameraGeometry::new(640.0, 480.0, 30.0)
        .with_focal_length(600.0)
        .with_mount(20.0, 18.0)
}

fn scene() -> RgbImage {
    let mut frame = RgbImage::from_pixel(640, 480, Rgb([30, 30, 30]));
    draw_filled_circle_mut(&mut frame, (120, 300), 25, BALL);
    draw_filled_rect_mut(&mut frame, Rect::at(300, 120).of_size(40, 20), TAPE);
    frame
}

#[test]
fn settings_file_exposes_every_section() {
    let store = CalibrationStore::load(SETTINGS).expect("load settings");
    for class in TargetClass::ALL {
        assert!(!store.section(class).is_empty(), "{class} is empty");
    }
    assert_eq!(store.ball().get_raw("radius"), Some("3.5"));
    assert_eq!(store.goal_target().get_int("MINAREA"), Ok(400));
    assert_eq!(store.vision_tape().get_raw("LOCKTOLERANCE"), Some("1.5"));
}

#[test]
fn one_frame_yields_ball_and_tape() {
    let library = VisionLibrary::load(SETTINGS).expect("load");
    let frame = scene();

    let balls = library.detect_balls(&frame, &camera()).expect("balls");
    assert_eq!(balls.count, 1);
    let ball = balls.balls[0];
    assert!((ball.radius - 25.0).abs() < 3.0, "radius {}", ball.radius);
    assert!(ball.angle < 0.0);
    assert!(ball.offset > 0.0);

    let tape = library.detect_tape(&frame, &camera()).expect("tape");
    assert!(tape.found);
    assert!(tape.locked, "offset {}", tape.real_world.center_offset);
    assert!(tape.real_world.target_rotation < 2.0);
}

#[test]
fn edge_contours_also_find_the_tape() {
    let library = VisionLibrary::load(SETTINGS).expect("load");
    let mut frame = RgbImage::from_pixel(640, 480, Rgb([30, 30, 30]));
    draw_filled_rect_mut(&mut frame, Rect::at(280, 200).of_size(80, 40), TAPE);

    let edges = library.segment_edges(&frame).expect("edges");
    assert!(!edges.is_empty());

    let tape = library
        .detect_tape_from_edges(&frame, &camera())
        .expect("tape from edges");
    assert!(tape.found);
    assert!((tape.camera.width - 80.0).abs() <= 4.0, "width {}", tape.camera.width);
}

#[test]
fn skip_policy_is_applied_by_the_library() {
    let library = VisionLibrary::load(SETTINGS)
        .expect("load")
        .with_scan_policy(ScanPolicy::SkipUndersized);
    let mut frame = RgbImage::from_pixel(640, 480, Rgb([30, 30, 30]));
    draw_filled_circle_mut(&mut frame, (100, 100), 30, BALL);
    draw_filled_circle_mut(&mut frame, (500, 100), 20, BALL);

    let balls = library.detect_balls(&frame, &camera()).expect("balls");
    assert_eq!(balls.count, 2);
    assert!(balls.balls[0].radius > balls.balls[1].radius);
}

#[test]
fn overlay_marks_detections() {
    let library = VisionLibrary::load(SETTINGS).expect("load");
    let frame = scene();
    let balls = library.detect_balls(&frame, &camera()).expect("balls");
    let tape = library.detect_tape(&frame, &camera()).expect("tape");

    let out = overlay::render(&frame, Some(&balls), Some(&tape));
    let ball = balls.balls[0];
    let center = (ball.center.x.round() as u32, ball.center.y.round() as u32);
    assert_eq!(*out.get_pixel(center.0, center.1), overlay::BALL_COLOR);
    assert!(out.pixels().any(|p| *p == overlay::LOCKED_COLOR));
}
