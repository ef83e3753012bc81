//! Direct least-squares ellipse fitting (Fitzgibbon et al., 1999) in the
//! numerically stable reduced form of Halíř and Flusser (1998).

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

use super::ellipse::{Ellipse, FIT_ANGLE_OFFSET_DEG};

/// Minimum number of points accepted by [`fit_ellipse`].
pub const MIN_FIT_POINTS: usize = 6;

/// Relative axis difference below which a fit counts as a circle.
///
/// A circle has no preferred direction; its major axis is pinned to +x so
/// the ring sampler starts from a reproducible angle.
const CIRCULAR_REL_TOL: f64 = 1e-6;

/// Fits an ellipse to a point set.
///
/// Returns `None` for fewer than [`MIN_FIT_POINTS`] points, degenerate
/// (collinear or coincident) input, or a conic that is not a real ellipse.
/// The returned angle follows the backend convention documented on
/// [`FIT_ANGLE_OFFSET_DEG`].
pub fn fit_ellipse(points: &[[f64; 2]]) -> Option<Ellipse> {
    if points.len() < MIN_FIT_POINTS {
        return None;
    }

    let (mean_x, mean_y, scale) = normalization_params(points);

    // Scatter matrix of the design rows [x², xy, y², x, y, 1].
    let mut scatter = Matrix6::<f64>::zeros();
    for p in points {
        let x = (p[0] - mean_x) * scale;
        let y = (p[1] - mean_y) * scale;
        let row = Vector6::new(x * x, x * y, y * y, x, y, 1.0);
        scatter += row * row.transpose();
    }

    let s1 = scatter.fixed_view::<3, 3>(0, 0).into_owned();
    let s2 = scatter.fixed_view::<3, 3>(0, 3).into_owned();
    let s3 = scatter.fixed_view::<3, 3>(3, 3).into_owned();

    let s3_inv = s3.try_inverse()?;
    let t = -s3_inv * s2.transpose();
    let reduced = s1 + s2 * t;

    // Inverse of the constraint matrix [[0, 0, 2], [0, -1, 0], [2, 0, 0]].
    let c1_inv = Matrix3::new(0.0, 0.0, 0.5, 0.0, -1.0, 0.0, 0.5, 0.0, 0.0);
    let system = c1_inv * reduced;

    // The ellipse solution belongs to the largest eigenvalue (non-negative,
    // zero for noise-free points). Circular input can turn the two negative
    // ones into a near-degenerate complex pair, so only real parts are used.
    let mut eigenvalues: Vec<f64> = system
        .complex_eigenvalues()
        .iter()
        .map(|ev| ev.re)
        .filter(|ev| ev.is_finite())
        .collect();
    eigenvalues.sort_by(|a, b| b.total_cmp(a));
    let a1 = eigenvalues
        .into_iter()
        .filter_map(|ev| null_vector(&(system - Matrix3::identity() * ev)))
        .find(|v| 4.0 * v[0] * v[2] - v[1] * v[1] > 0.0)?;
    let a2 = t * a1;

    let coeffs = denormalize_conic(
        [a1[0], a1[1], a1[2], a2[0], a2[1], a2[2]],
        mean_x,
        mean_y,
        scale,
    );
    conic_to_ellipse(coeffs)
}

/// Shift to the centroid and scale the mean radius to √2.
fn normalization_params(points: &[[f64; 2]]) -> (f64, f64, f64) {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| (p[0] - mean_x).hypot(p[1] - mean_y))
        .sum::<f64>()
        / n;
    let scale = if mean_dist > 1e-15 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    (mean_x, mean_y, scale)
}

/// Null vector of a rank-2 3×3 matrix from the largest cross product of its rows.
fn null_vector(m: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let rows: [Vector3<f64>; 3] = [
        m.row(0).transpose(),
        m.row(1).transpose(),
        m.row(2).transpose(),
    ];
    let best = [
        rows[0].cross(&rows[1]),
        rows[0].cross(&rows[2]),
        rows[1].cross(&rows[2]),
    ]
    .into_iter()
    .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    let norm = best.norm();
    if norm < 1e-15 || !norm.is_finite() {
        return None;
    }
    Some(best / norm)
}

/// Maps coefficients fitted in `x' = s(x - mx)`, `y' = s(y - my)` back to
/// pixel coordinates.
fn denormalize_conic(c: [f64; 6], mx: f64, my: f64, s: f64) -> [f64; 6] {
    let [a_, b_, c_, d_, e_, f_] = c;
    let s2 = s * s;
    let a = a_ * s2;
    let b = b_ * s2;
    let c = c_ * s2;
    let d = -2.0 * a_ * s2 * mx - b_ * s2 * my + d_ * s;
    let e = -b_ * s2 * mx - 2.0 * c_ * s2 * my + e_ * s;
    let f =
        a_ * s2 * mx * mx + b_ * s2 * mx * my + c_ * s2 * my * my - d_ * s * mx - e_ * s * my + f_;
    [a, b, c, d, e, f]
}

/// Geometric parameters of `A x² + B xy + C y² + D x + E y + F = 0`.
fn conic_to_ellipse(coeffs: [f64; 6]) -> Option<Ellipse> {
    // Fix the overall sign so the quadratic part is positive definite.
    let coeffs = if coeffs[0] + coeffs[2] < 0.0 {
        coeffs.map(|v| -v)
    } else {
        coeffs
    };
    let [a, b, c, d, e, f] = coeffs;

    let denom = 4.0 * a * c - b * b;
    if denom <= 0.0 {
        return None;
    }
    let cx = (b * e - 2.0 * c * d) / denom;
    let cy = (b * d - 2.0 * a * e) / denom;

    let f_center = a * cx * cx + b * cx * cy + c * cy * cy + d * cx + e * cy + f;
    if f_center >= 0.0 {
        return None;
    }

    let sum = a + c;
    let diff = ((a - c).powi(2) + b * b).sqrt();
    let lambda_big = (sum + diff) * 0.5;
    let lambda_small = (sum - diff) * 0.5;
    if lambda_small <= 0.0 {
        return None;
    }

    // The larger eigenvalue belongs to the short axis.
    let semi_minor = (-f_center / lambda_big).sqrt();
    let semi_major = (-f_center / lambda_small).sqrt();
    if !semi_major.is_finite() || !semi_minor.is_finite() || semi_minor <= 0.0 {
        return None;
    }

    let minor_dir_deg = (0.5 * b.atan2(a - c)).to_degrees();
    let major_dir_deg = if semi_major - semi_minor <= CIRCULAR_REL_TOL * semi_major {
        0.0
    } else {
        minor_dir_deg + 90.0
    };

    Some(Ellipse::new(
        cx,
        cy,
        2.0 * semi_major,
        2.0 * semi_minor,
        major_dir_deg - FIT_ANGLE_OFFSET_DEG,
    ))
}

#[cfg(test)]
mod tests {
    use super::{fit_ellipse, FIT_ANGLE_OFFSET_DEG};
    use crate::geometry::Ellipse;

    fn angle_diff_mod_180(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(180.0);
        d.min(180.0 - d)
    }

    #[test]
    fn recovers_rotated_ellipse() {
        let truth = Ellipse::new(50.0, 40.0, 40.0, 20.0, 30.0);
        let points: Vec<[f64; 2]> = (0..36)
            .map(|i| truth.point_at(i as f64 * std::f64::consts::TAU / 36.0))
            .collect();
        let fit = fit_ellipse(&points).unwrap();
        assert!((fit.center()[0] - 50.0).abs() < 1e-6);
        assert!((fit.center()[1] - 40.0).abs() < 1e-6);
        assert!((fit.major() - 40.0).abs() < 1e-6);
        assert!((fit.minor() - 20.0).abs() < 1e-6);
        assert!(angle_diff_mod_180(fit.angle_deg(), 30.0) < 1e-6);
    }

    #[test]
    fn circle_major_axis_is_pinned_to_x() {
        let points: Vec<[f64; 2]> = (0..24)
            .map(|i| {
                let t = i as f64 * std::f64::consts::TAU / 24.0;
                [100.0 + 30.0 * t.cos(), 100.0 + 30.0 * t.sin()]
            })
            .collect();
        let fit = fit_ellipse(&points).unwrap();
        assert!((fit.major() - 60.0).abs() < 1e-6);
        assert!((fit.minor() - 60.0).abs() < 1e-6);
        assert!((fit.angle_deg() + FIT_ANGLE_OFFSET_DEG).abs() < 1e-9);
    }

    #[test]
    fn rejects_too_few_and_coincident_points() {
        let few = [[0.0, 0.0], [1.0, 1.0], [2.0, 0.0], [1.0, -1.0], [0.5, 0.5]];
        assert!(fit_ellipse(&few).is_none());
        let same = [[3.0, 4.0]; 8];
        assert!(fit_ellipse(&same).is_none());
    }
}
