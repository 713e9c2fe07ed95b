//! Shape fits on integer contours.

use frc_vision_core::{BoundingBox, Circle, Contour, RotatedRect};
use imageproc::point::Point;
use nalgebra::Point2;

const CIRCLE_EPS: f64 = 1e-7;

/// Polygon area enclosed by the contour, unsigned.
pub fn contour_area(contour: &Contour) -> f64 {
    imageproc::geometry::contour_area(&to_imageproc(&contour.points))
}

/// Smallest axis-aligned box covering every point, counting pixels inclusively.
pub fn bounding_rect(contour: &Contour) -> BoundingBox {
    let Some(first) = contour.points.first() else {
        return BoundingBox::default();
    };
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in &contour.points[1..] {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    BoundingBox::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1)
}

/// Convex hull without duplicate or collinear points.
pub fn convex_hull(points: &[Point2<i32>]) -> Vec<Point2<i32>> {
    let mut pts = to_imageproc(points);
    // Graham scan sorts around the lowest point; repeats of it break the order.
    pts.sort_by_key(|p| (p.x, p.y));
    pts.dedup();
    imageproc::geometry::convex_hull(pts)
        .into_iter()
        .map(|p| Point2::new(p.x, p.y))
        .collect()
}

fn to_imageproc(points: &[Point2<i32>]) -> Vec<Point<i32>> {
    points.iter().map(|p| Point::new(p.x, p.y)).collect()
}

/// Smallest circle containing every contour point.
///
/// Incremental Welzl construction over the convex hull; the hull keeps the
/// point count small for round blobs.
pub fn min_enclosing_circle(contour: &Contour) -> Circle {
    let pts: Vec<Point2<f64>> = convex_hull(&contour.points)
        .into_iter()
        .map(|p| Point2::new(f64::from(p.x), f64::from(p.y)))
        .collect();
    let Some(&first) = pts.first() else {
        return Circle::new(Point2::origin(), 0.0);
    };

    let mut circle = Circle::new(first, 0.0);
    for i in 1..pts.len() {
        if encloses(&circle, pts[i]) {
            continue;
        }
        circle = Circle::new(pts[i], 0.0);
        for j in 0..i {
            if encloses(&circle, pts[j]) {
                continue;
            }
            circle = circle_from_two(pts[i], pts[j]);
            for k in 0..j {
                if !encloses(&circle, pts[k]) {
                    circle = circle_from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    circle
}

fn encloses(circle: &Circle, p: Point2<f64>) -> bool {
    nalgebra::distance(&circle.center, &p) <= circle.radius * (1.0 + CIRCLE_EPS) + CIRCLE_EPS
}

fn circle_from_two(a: Point2<f64>, b: Point2<f64>) -> Circle {
    let center = nalgebra::center(&a, &b);
    Circle::new(center, nalgebra::distance(&a, &b) * 0.5)
}

fn circle_from_three(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Circle {
    let (bx, by) = (b.x - a.x, b.y - a.y);
    let (cx, cy) = (c.x - a.x, c.y - a.y);
    let d = 2.0 * (bx * cy - by * cx);
    if d.abs() < f64::EPSILON {
        // Collinear: the widest pair spans the circle.
        return [circle_from_two(a, b), circle_from_two(a, c), circle_from_two(b, c)]
            .into_iter()
            .fold(Circle::new(a, 0.0), |best, cand| {
                if cand.radius > best.radius {
                    cand
                } else {
                    best
                }
            });
    }
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    Circle::new(Point2::new(a.x + ux, a.y + uy), (ux * ux + uy * uy).sqrt())
}

/// Minimum-area enclosing rectangle (rotating calipers over the hull).
pub fn min_area_rect(contour: &Contour) -> RotatedRect {
    let hull = convex_hull(&contour.points);
    match hull.len() {
        0 => return RotatedRect::new(Point2::origin(), [0.0, 0.0], 0.0),
        1 => {
            let p = hull[0];
            return RotatedRect::new(Point2::new(f64::from(p.x), f64::from(p.y)), [0.0, 0.0], 0.0);
        }
        _ => {}
    }

    let pts: Vec<Point2<f64>> = hull
        .iter()
        .map(|p| Point2::new(f64::from(p.x), f64::from(p.y)))
        .collect();
    let n = pts.len();

    let mut best: Option<(f64, RotatedRect)> = None;
    for i in 0..n {
        let edge = pts[(i + 1) % n] - pts[i];
        let len = edge.norm();
        if len == 0.0 {
            continue;
        }
        let u = edge / len;
        let v = nalgebra::Vector2::new(-u.y, u.x);

        let (mut u0, mut u1, mut v0, mut v1) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for p in &pts {
            let pu = p.coords.dot(&u);
            let pv = p.coords.dot(&v);
            u0 = u0.min(pu);
            u1 = u1.max(pu);
            v0 = v0.min(pv);
            v1 = v1.max(pv);
        }

        let area = (u1 - u0) * (v1 - v0);
        if best.as_ref().is_some_and(|(a, _)| area >= *a) {
            continue;
        }
        let center = Point2::from(u * ((u0 + u1) * 0.5) + v * ((v0 + v1) * 0.5));
        let theta = u.y.atan2(u.x).to_degrees();
        best = Some((area, normalized_rect(center, u1 - u0, v1 - v0, theta)));
    }

    best.map(|(_, rect)| rect)
        .unwrap_or_else(|| RotatedRect::new(Point2::new(pts[0].x, pts[0].y), [0.0, 0.0], 0.0))
}

/// Express a rectangle whose `width` side points along `theta` degrees with
/// an angle in `(-90, 0]`, swapping the sides when the angle moves by 90.
fn normalized_rect(center: Point2<f64>, width: f64, height: f64, theta: f64) -> RotatedRect {
    let t = theta.rem_euclid(90.0);
    let angle = if t < 1e-9 || 90.0 - t < 1e-9 { 0.0 } else { t - 90.0 };
    let quarter_turns = ((theta - angle) / 90.0).round() as i64;
    let size = if quarter_turns.rem_euclid(2) == 0 {
        [width, height]
    } else {
        [height, width]
    };
    RotatedRect::new(center, size, angle)
}

/// Drop the interior points of straight horizontal, vertical and diagonal
/// runs, keeping only the points where the chain changes direction.
pub fn compress_chain(mut points: Vec<Point2<i32>>) -> Vec<Point2<i32>> {
    points.dedup();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    let n = points.len();
    if n < 3 {
        return points;
    }
    let step = |a: Point2<i32>, b: Point2<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());
    let kept: Vec<Point2<i32>> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();
    if kept.is_empty() {
        points
    } else {
        kept
    }
}
