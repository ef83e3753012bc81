//! Geometric value types shared by the detection stages.
//!
//! Points are `[x, y]` pairs in pixel coordinates with `x` along columns and
//! `y` along rows, matching the contour backend.

mod ellipse;
mod fit;
mod polygon;
mod square;

pub use ellipse::{Ellipse, FIT_ANGLE_OFFSET_DEG};
pub use fit::{fit_ellipse, MIN_FIT_POINTS};
pub use polygon::{point_in_polygon, polygon_area, signed_area};
pub use square::Square;
