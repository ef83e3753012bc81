//! Geometric primitives consumed by the shape classifier.

use imageproc::geometry::{approximate_polygon_dp, arc_length, convex_hull};
use imageproc::point::Point;

use crate::geometry::{fit_ellipse, polygon_area, Ellipse};

/// Contour-level primitives of the image-processing backend.
///
/// Implementations must report ellipse angles in the convention described
/// by [`crate::geometry::FIT_ANGLE_OFFSET_DEG`].
pub trait ContourOps {
    /// Convex hull vertices of a point set.
    fn convex_hull(&self, points: &[Point<i32>]) -> Vec<Point<i32>>;

    /// Closed polygon approximation within `epsilon`, without a repeated
    /// closing vertex.
    fn approx_polygon(&self, points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>>;

    /// Perimeter of the closed curve.
    fn arc_length(&self, points: &[Point<i32>]) -> f64;

    /// Area enclosed by the closed curve.
    fn contour_area(&self, points: &[Point<i32>]) -> f64 {
        polygon_area(&to_f64(points))
    }

    /// Least-squares ellipse through the points.
    fn fit_ellipse(&self, points: &[Point<i32>]) -> Option<Ellipse> {
        fit_ellipse(&to_f64(points))
    }
}

/// Default backend built on `imageproc::geometry`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageprocOps;

impl ContourOps for ImageprocOps {
    fn convex_hull(&self, points: &[Point<i32>]) -> Vec<Point<i32>> {
        if points.len() < 3 {
            return points.to_vec();
        }
        convex_hull(points)
    }

    fn approx_polygon(&self, points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
        if points.len() < 3 || !(epsilon > 0.0) {
            return points.to_vec();
        }
        // Open form on a curve without a repeated closing point: the closed
        // form drops a corner, and a zero-length chord collapses the curve.
        let points = match points.split_last() {
            Some((last, rest)) if points.first() == Some(last) => rest,
            _ => points,
        };
        if points.len() < 3 {
            return points.to_vec();
        }
        let mut approx = approximate_polygon_dp(points, epsilon, false);
        // A start in the middle of an edge leaves a redundant first vertex.
        let redundant_start = match approx.as_slice() {
            [first, second, _, .., last] => distance_to_line(*first, *last, *second) <= epsilon,
            _ => false,
        };
        if redundant_start {
            approx.remove(0);
        }
        approx
    }

    fn arc_length(&self, points: &[Point<i32>]) -> f64 {
        if points.len() < 2 {
            return 0.0;
        }
        arc_length(points, true)
    }
}

/// Distance from `p` to the line through `a` and `b`.
fn distance_to_line(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (dx, dy) = (f64::from(b.x) - ax, f64::from(b.y) - ay);
    let len = dx.hypot(dy);
    let (px, py) = (f64::from(p.x) - ax, f64::from(p.y) - ay);
    if len == 0.0 {
        return px.hypot(py);
    }
    (dx * py - dy * px).abs() / len
}

pub(crate) fn to_f64(points: &[Point<i32>]) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|p| [f64::from(p.x), f64::from(p.y)])
        .collect()
}
