#![cfg(feature = "cli")]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use frc_vision::io::{VisionReport, VisionRunConfig};
use frc_vision::{CameraGeometry, ScanPolicy};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use predicates::str::contains;

const SETTINGS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/vision_settings.txt");
const RUN_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/vision_run_config.json");

fn write_scene(path: &Path) {
    let mut frame = RgbImage::from_pixel(640, 480, Rgb([30, 30, 30]));
    draw_filled_circle_mut(&mut frame, (480, 360), 30, Rgb([230, 200, 20]));
    draw_filled_rect_mut(&mut frame, Rect::at(300, 120).of_size(40, 20), Rgb([20, 200, 20]));
    frame.save(path).expect("save frame");
}

fn camera() -> CameraGeometry {
    CameraGeometry::new(640.0, 480.0, 30.0)
        .with_focal_length(600.0)
        .with_mount(20.0, 18.0)
}

#[test]
fn writes_report_and_overlay() {
    let dir = tempfile::tempdir().expect("tempdir");
    let frame_path = dir.path().join("frame.png");
    write_scene(&frame_path);

    let mut cfg = VisionRunConfig::new(frame_path.to_string_lossy(), SETTINGS, camera());
    let report_path = dir.path().join("report.json");
    let overlay_path = dir.path().join("overlay.png");
    cfg.output_path = Some(report_path.to_string_lossy().into_owned());
    cfg.overlay_path = Some(overlay_path.to_string_lossy().into_owned());
    let cfg_path = dir.path().join("run.json");
    cfg.write_json(&cfg_path).expect("write config");

    Command::cargo_bin("frc-vision")
        .expect("binary")
        .arg(&cfg_path)
        .arg("--log-level")
        .arg("warn")
        .assert()
        .success()
        .stdout(contains("wrote report JSON"));

    let report = VisionReport::load_json(&report_path).expect("report");
    assert_eq!((report.width, report.height), (640, 480));
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    let balls = report.balls.expect("balls");
    assert_eq!(balls.count, 1);
    assert!(balls.balls[0].angle > 0.0);
    let tape = report.tape.expect("tape");
    assert!(tape.found && tape.locked);
    assert!(overlay_path.exists());
    assert_eq!(report.overlay_path.as_deref(), Some(&*overlay_path.to_string_lossy()));
}

#[test]
fn missing_calibration_key_is_reported_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let frame_path = dir.path().join("frame.png");
    write_scene(&frame_path);
    let settings = dir.path().join("settings.txt");
    fs::write(&settings, "BALL:\nHMIN,18\n").expect("write settings");

    let mut cfg = VisionRunConfig::new(
        frame_path.to_string_lossy(),
        settings.to_string_lossy(),
        camera(),
    );
    cfg.targets.tape = false;
    let cfg_path = dir.path().join("run.json");
    cfg.write_json(&cfg_path).expect("write config");
    let report_path = dir.path().join("out.json");

    Command::cargo_bin("frc-vision")
        .expect("binary")
        .arg(&cfg_path)
        .arg("--output")
        .arg(&report_path)
        .assert()
        .success();

    let report = VisionReport::load_json(&report_path).expect("report");
    assert!(report.balls.is_none());
    assert!(report.tape.is_none());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("SMIN"), "{}", report.errors[0]);
}

#[test]
fn unreadable_config_fails() {
    Command::cargo_bin("frc-vision")
        .expect("binary")
        .arg("/no/such/run.json")
        .assert()
        .failure();
}

#[test]
fn sample_run_config_drives_the_binary_with_a_log_file() {
    let cfg = VisionRunConfig::load_json(RUN_CONFIG).expect("sample config");
    assert_eq!(cfg.camera, camera());
    assert_eq!(cfg.scan_policy, ScanPolicy::StopAtFirstUndersized);
    assert!(cfg.targets.balls && cfg.targets.tape && !cfg.targets.tape_from_edges);

    let dir = tempfile::tempdir().expect("tempdir");
    let frame_path = dir.path().join("frame.png");
    write_scene(&frame_path);
    let report_path = dir.path().join("report.json");
    let log_dir = dir.path().join("logs");

    let mut cfg = cfg;
    cfg.image_path = frame_path.to_string_lossy().into_owned();
    cfg.calibration_path = SETTINGS.to_owned();
    cfg.output_path = Some(report_path.to_string_lossy().into_owned());
    cfg.overlay_path = None;
    let cfg_path = dir.path().join("run.json");
    cfg.write_json(&cfg_path).expect("write config");

    Command::cargo_bin("frc-vision")
        .expect("binary")
        .arg(&cfg_path)
        .arg("--log-dir")
        .arg(&log_dir)
        .assert()
        .success();

    let report = VisionReport::load_json(&report_path).expect("report");
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert_eq!(report.balls.expect("balls").count, 1);

    let logs: Vec<_> = fs::read_dir(&log_dir)
        .expect("log dir")
        .map(|entry| entry.expect("entry").path())
        .collect();
    assert_eq!(logs.len(), 1, "{logs:?}");
    let name = logs[0].file_name().expect("name").to_string_lossy().into_owned();
    assert!(name.starts_with("frc_vision_") && name.ends_with(".txt"), "{name}");
    let text = fs::read_to_string(&logs[0]).expect("read log");
    assert!(text.contains("logging to"), "{text}");
}

#[test]
fn unknown_log_level_is_rejected() {
    Command::cargo_bin("frc-vision")
        .expect("binary")
        .arg(RUN_CONFIG)
        .arg("--log-level")
        .arg("loud")
        .assert()
        .failure()
        .stderr(contains("loud"));
}

#[test]
fn failed_overlay_save_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let frame_path = dir.path().join("frame.png");
    write_scene(&frame_path);
    let report_path = dir.path().join("report.json");

    let mut cfg = VisionRunConfig::new(frame_path.to_string_lossy(), SETTINGS, camera());
    cfg.output_path = Some(report_path.to_string_lossy().into_owned());
    let overlay_path = dir.path().join("missing").join("overlay.png");
    cfg.overlay_path = Some(overlay_path.to_string_lossy().into_owned());
    let cfg_path = dir.path().join("run.json");
    cfg.write_json(&cfg_path).expect("write config");

    Command::cargo_bin("frc-vision")
        .expect("binary")
        .arg(&cfg_path)
        .assert()
        .success()
        .stderr(contains("failed to save overlay"));

    let report = VisionReport::load_json(&report_path).expect("report");
    assert!(report.overlay_path.is_none());
    assert_eq!(report.errors.len(), 1, "{:?}", report.errors);
    assert!(report.errors[0].contains("failed to save overlay"), "{}", report.errors[0]);
    assert!(report.balls.is_some() && report.tape.is_some());
}
