//! Closed polygon helpers.

/// Signed shoelace area; positive for counter-clockwise vertices in a
/// y-up frame (clockwise on screen).
pub fn signed_area(points: &[[f64; 2]]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice += p[0] * q[1] - q[0] * p[1];
    }
    twice * 0.5
}

/// Unsigned area enclosed by a closed contour.
pub fn polygon_area(points: &[[f64; 2]]) -> f64 {
    signed_area(points).abs()
}

/// Point-in-polygon test returning `1.0` inside, `0.0` on an edge and
/// `-1.0` outside.
///
/// The result does not depend on vertex winding.
pub fn point_in_polygon(vertices: &[[f64; 2]], p: [f64; 2]) -> f64 {
    if vertices.len() < 3 {
        return -1.0;
    }
    let mut inside = false;
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        if on_segment(a, b, p) {
            return 0.0;
        }
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x_cross = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if p[0] < x_cross {
                inside = !inside;
            }
        }
    }
    if inside {
        1.0
    } else {
        -1.0
    }
}

fn on_segment(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> bool {
    let cross = (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0]);
    if cross.abs() > 1e-9 {
        return false;
    }
    p[0] >= a[0].min(b[0]) - 1e-9
        && p[0] <= a[0].max(b[0]) + 1e-9
        && p[1] >= a[1].min(b[1]) - 1e-9
        && p[1] <= a[1].max(b[1]) + 1e-9
}
