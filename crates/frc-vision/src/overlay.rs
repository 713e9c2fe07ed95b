//! Draw detections on a copy of the frame for operator feedback.

use frc_vision_ball::BallDetectionResult;
use frc_vision_tape::TapeDetection;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_circle_mut, draw_line_segment_mut};

pub const BALL_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
pub const TAPE_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
pub const LOCKED_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Outline every accepted ball and mark its center.
pub fn draw_balls(img: &mut RgbImage, balls: &BallDetectionResult) {
    for ball in &balls.balls {
        let center = (ball.center.x.round() as i32, ball.center.y.round() as i32);
        draw_hollow_circle_mut(img, center, ball.radius.round() as i32, BALL_COLOR);
        draw_cross_mut(img, BALL_COLOR, center.0, center.1);
    }
}

/// Outline the tape's rotated box; green once locked. Nothing is drawn when
/// the tape was not found.
pub fn draw_tape(img: &mut RgbImage, tape: &TapeDetection) {
    let Some(points) = tape.box_points else {
        return;
    };
    let color = if tape.locked { LOCKED_COLOR } else { TAPE_COLOR };
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        draw_line_segment_mut(
            img,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            color,
        );
    }
}

/// Copy of `frame` with all detections drawn on it.
pub fn render(
    frame: &RgbImage,
    balls: Option<&BallDetectionResult>,
    tape: Option<&TapeDetection>,
) -> RgbImage {
    let mut out = frame.clone();
    if let Some(balls) = balls {
        draw_balls(&mut out, balls);
    }
    if let Some(tape) = tape {
        draw_tape(&mut out, tape);
    }
    out
}
