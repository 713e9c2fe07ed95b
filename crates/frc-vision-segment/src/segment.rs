//! Frame -> contour pipelines.

use frc_vision_core::{Contour, HsvBounds, SegmentError};
use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use log::debug;
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::fit::compress_chain;
use crate::hsv::{hsv_mask, to_hsv};
use crate::params::SegmentParams;

fn check_frame(frame: &RgbImage) -> Result<(), SegmentError> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(SegmentError::EmptyFrame { width, height });
    }
    Ok(())
}

fn blurred_hsv(frame: &RgbImage, params: &SegmentParams) -> RgbImage {
    if params.blur_sigma > 0.0 {
        to_hsv(&imageproc::filter::gaussian_blur_f32(frame, params.blur_sigma))
    } else {
        to_hsv(frame)
    }
}

/// Color variant: blur, convert to HSV, keep pixels inside `bounds`, trace
/// the outer borders of the resulting mask.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(frame, bounds, params), fields(width = frame.width(), height = frame.height()))
)]
pub fn segment_color(
    frame: &RgbImage,
    bounds: &HsvBounds,
    params: &SegmentParams,
) -> Result<Vec<Contour>, SegmentError> {
    check_frame(frame)?;
    let mask = hsv_mask(&blurred_hsv(frame, params), bounds);
    let contours = external_contours(&mask);
    debug!("color segmentation found {} contours", contours.len());
    Ok(contours)
}

/// Edge variant for targets where color thresholding is unreliable: blur,
/// convert to HSV, run Canny on each channel, trace the outer borders of the
/// union of the three edge maps.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(frame, params), fields(width = frame.width(), height = frame.height()))
)]
pub fn segment_edges(frame: &RgbImage, params: &SegmentParams) -> Result<Vec<Contour>, SegmentError> {
    check_frame(frame)?;
    let hsv = blurred_hsv(frame, params);
    let edges = hsv_edges(&hsv, params);
    let contours = external_contours(&edges);
    debug!("edge segmentation found {} contours", contours.len());
    Ok(contours)
}

/// Canny per channel, merged so a pixel is an edge if any channel has one.
/// Hue-only boundaries survive, which a value-only map would lose.
fn hsv_edges(hsv: &RgbImage, params: &SegmentParams) -> GrayImage {
    let (width, height) = hsv.dimensions();
    let mut merged = GrayImage::new(width, height);
    for channel in 0..3 {
        let plane = GrayImage::from_fn(width, height, |x, y| Luma([hsv.get_pixel(x, y)[channel]]));
        let edges = imageproc::edges::canny(&plane, params.canny_low, params.canny_high);
        for (out, edge) in merged.pixels_mut().zip(edges.pixels()) {
            out.0[0] = out.0[0].max(edge.0[0]);
        }
    }
    merged
}

/// Outer borders of the non-zero regions of `mask`; holes and shapes nested
/// inside other shapes are dropped.
pub fn external_contours(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let points = c.points.iter().map(|p| Point2::new(p.x, p.y)).collect();
            Contour::new(compress_chain(points))
        })
        .collect()
}
