use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Closed boundary of one connected region, in pixel coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point2<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point2<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(i32, i32)> for Contour {
    fn from_iter<T: IntoIterator<Item = (i32, i32)>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(|(x, y)| Point2::new(x, y)).collect())
    }
}

/// Circle in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

/// Axis-aligned integer box; `width` and `height` count pixels inclusively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `width / height`, or 0 for an empty box.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Minimum-area rectangle of a contour.
///
/// `size` is `[width, height]`, where width runs along `angle`. The angle is
/// in degrees within `(-90, 0]`; an axis-aligned rectangle reports 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center: Point2<f64>,
    pub size: [f64; 2],
    pub angle: f64,
}

impl RotatedRect {
    pub fn new(center: Point2<f64>, size: [f64; 2], angle: f64) -> Self {
        Self {
            center,
            size,
            angle,
        }
    }

    /// Corner points, ordered around the rectangle.
    pub fn corners(&self) -> [Point2<f64>; 4] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let (b, a) = (cos * 0.5, sin * 0.5);
        let [w, h] = self.size;
        let c = self.center;

        let p0 = Point2::new(c.x - a * h - b * w, c.y + b * h - a * w);
        let p1 = Point2::new(c.x + a * h - b * w, c.y - b * h - a * w);
        let p2 = Point2::new(2.0 * c.x - p0.x, 2.0 * c.y - p0.y);
        let p3 = Point2::new(2.0 * c.x - p1.x, 2.0 * c.y - p1.y);
        [p0, p1, p2, p3]
    }

    /// Corner points truncated toward zero, ready for drawing.
    pub fn box_points(&self) -> [Point2<i32>; 4] {
        self.corners().map(|p| Point2::new(p.x as i32, p.y as i32))
    }

    pub fn area(&self) -> f64 {
        self.size[0] * self.size[1]
    }
}
