use frc_vision_core::RotatedRect;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Placeholder for position, size and distance fields when no target was found.
pub const SENTINEL: f64 = 1000.0;

/// Pixel-space measurements of the selected tape contour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TapeCameraValues {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub inches_per_pixel: f64,
    /// Horizontal offset of the box center from the image center, in pixels.
    pub offset_px: f64,
}

impl Default for TapeCameraValues {
    fn default() -> Self {
        Self {
            x: SENTINEL,
            y: SENTINEL,
            width: SENTINEL,
            height: SENTINEL,
            inches_per_pixel: 0.0,
            offset_px: 0.0,
        }
    }
}

/// Physical measurements derived from the camera values. Distances in
/// inches, angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TapeRealWorldValues {
    pub aspect_ratio: f64,
    /// Lateral offset in inches; positive when the tape is left of center.
    pub center_offset: f64,
    pub straight_distance: f64,
    /// Ground-projected distance; stays at [`SENTINEL`] when the height
    /// difference exceeds the straight-line distance.
    pub tape_distance: f64,
    pub wall_distance: f64,
    pub horizontal_angle: f64,
    pub vertical_angle: f64,
    /// Camera angle recovered from the rotated rectangle, in `[0, 45]`.
    pub target_rotation: f64,
    pub bot_angle: f64,
    pub apparent_width: f64,
    /// Vertical offset in inches.
    pub vertical_offset: f64,
}

impl Default for TapeRealWorldValues {
    fn default() -> Self {
        Self {
            aspect_ratio: 0.0,
            center_offset: 0.0,
            straight_distance: SENTINEL,
            tape_distance: SENTINEL,
            wall_distance: SENTINEL,
            horizontal_angle: 0.0,
            vertical_angle: 0.0,
            target_rotation: 0.0,
            bot_angle: 0.0,
            apparent_width: 0.0,
            vertical_offset: 0.0,
        }
    }
}

/// Outcome of one tape detection call. Always present; check `found`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TapeDetection {
    pub camera: TapeCameraValues,
    pub real_world: TapeRealWorldValues,
    pub found: bool,
    pub locked: bool,
    /// Minimum-area rectangle of the selected contour, for overlays.
    pub rotated_rect: Option<RotatedRect>,
    /// Corners of `rotated_rect` truncated to integer pixels.
    pub box_points: Option<[Point2<i32>; 4]>,
}

impl TapeDetection {
    /// Detection with every field at its sentinel value.
    pub fn not_found() -> Self {
        Self::default()
    }
}
