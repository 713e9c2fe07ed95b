//! RGB to HSV conversion and inclusive range masks.

use frc_vision_core::HsvBounds;
use image::{GrayImage, Luma, Rgb, RgbImage};

/// Convert one RGB pixel to 8-bit HSV (`h` in `[0, 180)`, `s`, `v` in `[0, 255]`).
#[inline]
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let v = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if v == rf {
        60.0 * (gf - bf) / diff
    } else if v == gf {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    // Hue is circular; 180 wraps to 0.
    let h = (h * 0.5).round() as u16 % 180;
    [h as u8, s.round() as u8, v as u8]
}

/// Convert a whole frame; the channels of the result are `(h, s, v)`.
pub fn to_hsv(frame: &RgbImage) -> RgbImage {
    let mut out = RgbImage::new(frame.width(), frame.height());
    for (src, dst) in frame.pixels().zip(out.pixels_mut()) {
        *dst = Rgb(rgb_to_hsv(src.0));
    }
    out
}

/// Binary mask: 255 where the HSV pixel lies within `bounds`, else 0.
pub fn hsv_mask(hsv: &RgbImage, bounds: &HsvBounds) -> GrayImage {
    let mut mask = GrayImage::new(hsv.width(), hsv.height());
    for (src, dst) in hsv.pixels().zip(mask.pixels_mut()) {
        *dst = Luma([if bounds.contains(src.0) { 255 } else { 0 }]);
    }
    mask
}
