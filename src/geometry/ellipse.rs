//! Ellipse value type.

use crate::util::math::{sin_cos_deg, wrap_deg};

/// Offset between the fitted `angle_deg` and the major-axis direction.
///
/// The fitting primitive reports the angle of the minor axis, so the major
/// axis lies at `angle_deg + FIT_ANGLE_OFFSET_DEG`. Ring sampling applies the
/// same offset. A replacement fitting backend must report angles in this
/// convention or the ring start angle shifts by a quarter turn.
pub const FIT_ANGLE_OFFSET_DEG: f64 = 90.0;

/// Ellipse with full axis lengths and a rotation in degrees.
///
/// Constructed through [`Ellipse::new`], which guarantees
/// `major >= minor >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    cx: f64,
    cy: f64,
    major: f64,
    minor: f64,
    angle_deg: f64,
}

impl Ellipse {
    /// Creates an ellipse, swapping the axes if `minor > major`.
    ///
    /// Swapping rotates the angle by 90 degrees so the described curve is
    /// unchanged. The angle is wrapped to [-180, 180).
    pub fn new(cx: f64, cy: f64, major: f64, minor: f64, angle_deg: f64) -> Self {
        let (major, minor) = (major.abs(), minor.abs());
        let (major, minor, angle_deg) = if minor > major {
            (minor, major, angle_deg + 90.0)
        } else {
            (major, minor, angle_deg)
        };
        Self {
            cx,
            cy,
            major,
            minor,
            angle_deg: wrap_deg(angle_deg),
        }
    }

    /// Centre as `[x, y]`.
    pub fn center(&self) -> [f64; 2] {
        [self.cx, self.cy]
    }

    /// Full major axis length (`Ma`).
    pub fn major(&self) -> f64 {
        self.major
    }

    /// Full minor axis length (`ma`).
    pub fn minor(&self) -> f64 {
        self.minor
    }

    /// Half of the major axis.
    pub fn semi_major(&self) -> f64 {
        self.major * 0.5
    }

    /// Half of the minor axis.
    pub fn semi_minor(&self) -> f64 {
        self.minor * 0.5
    }

    /// Rotation in the fitting backend's convention, see [`FIT_ANGLE_OFFSET_DEG`].
    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    /// Concentric copy with both axes multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.cx,
            self.cy,
            self.major * factor,
            self.minor * factor,
            self.angle_deg,
        )
    }

    /// Point on the boundary at parametric angle `theta` (radians).
    pub fn point_at(&self, theta: f64) -> [f64; 2] {
        let (sin_r, cos_r) = sin_cos_deg(self.angle_deg + FIT_ANGLE_OFFSET_DEG);
        let (sin_t, cos_t) = theta.sin_cos();
        let px = self.semi_major() * cos_t;
        let py = self.semi_minor() * sin_t;
        [
            self.cx + cos_r * px - sin_r * py,
            self.cy + sin_r * px + cos_r * py,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::Ellipse;

    #[test]
    fn new_swaps_axes_and_rotates() {
        let e = Ellipse::new(1.0, 2.0, 10.0, 20.0, 0.0);
        assert_eq!(e.major(), 20.0);
        assert_eq!(e.minor(), 10.0);
        assert!((e.angle_deg() - 90.0).abs() < 1e-12);
    }

    #[test]
    fn swapped_ellipse_traces_same_curve() {
        let a = Ellipse::new(0.0, 0.0, 10.0, 20.0, 0.0);
        // Major axis of `a` lies along the x-axis after normalisation.
        let tip = a.point_at(0.0);
        assert!((tip[0].abs() - 10.0).abs() < 1e-9);
        assert!(tip[1].abs() < 1e-9);
    }

    #[test]
    fn scaled_keeps_center_and_angle() {
        let e = Ellipse::new(5.0, 6.0, 40.0, 30.0, 12.0);
        let s = e.scaled(0.5);
        assert_eq!(s.center(), [5.0, 6.0]);
        assert_eq!(s.major(), 20.0);
        assert_eq!(s.minor(), 15.0);
        assert_eq!(s.angle_deg(), 12.0);
    }

    #[test]
    fn point_at_zero_lies_on_major_axis() {
        let e = Ellipse::new(0.0, 0.0, 20.0, 10.0, -90.0);
        let p = e.point_at(0.0);
        assert!((p[0] - 10.0).abs() < 1e-9);
        assert!(p[1].abs() < 1e-9);
        let q = e.point_at(std::f64::consts::FRAC_PI_2);
        assert!(q[0].abs() < 1e-9);
        assert!((q[1] - 5.0).abs() < 1e-9);
    }
}
