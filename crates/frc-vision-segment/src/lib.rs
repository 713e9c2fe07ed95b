//! Segmentation stage: isolate target pixels and return their contours.
//!
//! Two interchangeable contour sources are provided:
//! - color: blur -> HSV -> inclusive threshold -> external contours,
//! - edges: blur -> HSV -> Canny on the value channel -> external contours.
//!
//! Detectors talk to pixels only through the [`VisionBackend`] trait, which
//! also carries the shape fits (area, enclosing circle, bounding boxes).
//! [`ImageprocBackend`] is the default implementation on top of `image` and
//! `imageproc`.

mod backend;
mod fit;
mod hsv;
mod params;
mod segment;

pub use backend::{ImageprocBackend, VisionBackend};
pub use fit::{
    bounding_rect, compress_chain, contour_area, convex_hull, min_area_rect,
    min_enclosing_circle,
};
pub use hsv::{hsv_mask, rgb_to_hsv, to_hsv};
pub use params::SegmentParams;
pub use segment::{external_contours, segment_color, segment_edges};
