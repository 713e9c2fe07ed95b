use serde::{Deserialize, Serialize};

/// Camera geometry supplied by the caller for each detection.
///
/// Nothing here is derived from images; the values come from the camera
/// data sheet and the robot's mount.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraGeometry {
    /// Frame width in pixels.
    pub width_px: f64,
    /// Frame height in pixels.
    pub height_px: f64,
    /// Field of view in degrees, as used by the ball range formula.
    pub fov_deg: f64,
    /// Focal length in pixels, used for tape range.
    #[serde(default)]
    pub focal_length_px: f64,
    /// Camera tilt in degrees. Carried for callers; range math does not use it.
    #[serde(default)]
    pub mount_angle_deg: f64,
    /// Lens height above the floor in inches.
    #[serde(default)]
    pub mount_height_in: f64,
}

impl CameraGeometry {
    pub fn new(width_px: f64, height_px: f64, fov_deg: f64) -> Self {
        Self {
            width_px,
            height_px,
            fov_deg,
            focal_length_px: 0.0,
            mount_angle_deg: 0.0,
            mount_height_in: 0.0,
        }
    }

    pub fn with_focal_length(mut self, focal_length_px: f64) -> Self {
        self.focal_length_px = focal_length_px;
        self
    }

    pub fn with_mount(mut self, angle_deg: f64, height_in: f64) -> Self {
        self.mount_angle_deg = angle_deg;
        self.mount_height_in = height_in;
        self
    }

    /// Horizontal image center in pixels.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.width_px / 2.0
    }

    /// Vertical image center in pixels.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.height_px / 2.0
    }

    #[inline]
    pub fn area_px(&self) -> f64 {
        self.width_px * self.height_px
    }
}
