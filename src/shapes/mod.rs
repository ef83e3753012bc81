//! Shape classification: contours to candidate squares and ellipses.
//!
//! Every contour is handled independently. Its convex hull feeds the ellipse
//! fit, and a polygon approximation of the same hull feeds the square test.
//! Nothing is rejected on the ellipse side beyond the minimum hull size;
//! false positives are filtered by the target classifier.

mod ops;

pub use ops::{ContourOps, ImageprocOps};

use imageproc::point::Point;

use crate::geometry::{Ellipse, Square, MIN_FIT_POINTS};
use crate::preprocess::Contour;
use crate::trace::{trace_event, trace_reject, trace_span};
use crate::util::{RadTargetError, RadTargetResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Parameters of the shape classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeConfig {
    /// Polygon approximation tolerance as a fraction of the contour perimeter.
    pub epsilon: f64,
    /// Smallest accepted square area.
    pub min_area: f64,
    /// Largest accepted square area.
    pub max_area: f64,
    /// Minimum number of convex hull points required for an ellipse fit.
    pub min_hull_points: usize,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            min_area: 200.0,
            max_area: 4000.0,
            min_hull_points: MIN_FIT_POINTS,
        }
    }
}

impl ShapeConfig {
    /// Checks ranges of all fields.
    pub fn validate(&self) -> RadTargetResult<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(RadTargetError::InvalidConfig {
                reason: "shapes.epsilon must be finite and > 0",
            });
        }
        if !self.min_area.is_finite() || !self.max_area.is_finite() || self.min_area < 0.0 {
            return Err(RadTargetError::InvalidConfig {
                reason: "shapes area bounds must be finite and non-negative",
            });
        }
        if self.max_area < self.min_area {
            return Err(RadTargetError::InvalidConfig {
                reason: "shapes.max_area must be >= shapes.min_area",
            });
        }
        if self.min_hull_points < MIN_FIT_POINTS {
            return Err(RadTargetError::InvalidConfig {
                reason: "shapes.min_hull_points must be at least 6",
            });
        }
        Ok(())
    }
}

/// Candidate shapes found in one contour set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shapes {
    /// Four-vertex frames within the area bounds, in contour order.
    pub squares: Vec<Square>,
    /// One fitted ellipse per contour with a large enough hull, in contour order.
    pub ellipses: Vec<Ellipse>,
}

/// Shapes derived from a single contour.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContourShapes {
    pub square: Option<Square>,
    pub ellipse: Option<Ellipse>,
}

/// Classifies one contour into an optional square and an optional ellipse.
pub fn classify_contour<O: ContourOps>(
    contour: &[Point<i32>],
    ops: &O,
    cfg: &ShapeConfig,
) -> ContourShapes {
    let hull = ops.convex_hull(contour);
    ContourShapes {
        square: square_candidate(contour, &hull, ops, cfg),
        ellipse: ellipse_candidate(&hull, ops, cfg),
    }
}

fn ellipse_candidate<O: ContourOps>(
    hull: &[Point<i32>],
    ops: &O,
    cfg: &ShapeConfig,
) -> Option<Ellipse> {
    if hull.len() < cfg.min_hull_points {
        return None;
    }
    let ellipse = ops.fit_ellipse(hull);
    if ellipse.is_none() {
        trace_reject!("ellipse_fit_failed", hull_points = hull.len());
    }
    ellipse
}

fn square_candidate<O: ContourOps>(
    contour: &[Point<i32>],
    hull: &[Point<i32>],
    ops: &O,
    cfg: &ShapeConfig,
) -> Option<Square> {
    let area = ops.contour_area(contour).abs();
    let tolerance = cfg.epsilon * ops.arc_length(contour);
    let approx = ops.approx_polygon(hull, tolerance);
    if approx.len() != 4 {
        return None;
    }
    if area < cfg.min_area || area > cfg.max_area {
        trace_reject!("square_area_out_of_range", area = area);
        return None;
    }
    Square::from_vertices(&ops::to_f64(&approx))
}

/// Classifies every contour, preserving contour order in both outputs.
pub fn classify_shapes<O: ContourOps>(
    contours: &[Contour],
    ops: &O,
    cfg: &ShapeConfig,
) -> Shapes {
    let _span = trace_span!("classify_shapes", contours = contours.len()).entered();
    let per_contour: Vec<ContourShapes> = contours
        .iter()
        .map(|c| classify_contour(&c.points, ops, cfg))
        .collect();
    collect_shapes(per_contour)
}

/// Parallel variant of [`classify_shapes`] with identical output.
#[cfg(feature = "rayon")]
pub fn classify_shapes_par<O: ContourOps + Sync>(
    contours: &[Contour],
    ops: &O,
    cfg: &ShapeConfig,
) -> Shapes {
    let _span = trace_span!("classify_shapes", contours = contours.len(), parallel = true).entered();
    let per_contour: Vec<ContourShapes> = contours
        .par_iter()
        .map(|c| classify_contour(&c.points, ops, cfg))
        .collect();
    collect_shapes(per_contour)
}

fn collect_shapes(per_contour: Vec<ContourShapes>) -> Shapes {
    let mut shapes = Shapes::default();
    for item in per_contour {
        shapes.squares.extend(item.square);
        shapes.ellipses.extend(item.ellipse);
    }
    trace_event!(
        "shapes",
        squares = shapes.squares.len(),
        ellipses = shapes.ellipses.len()
    );
    shapes
}
