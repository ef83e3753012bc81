//! Low-level building blocks for custom detection pipelines.
//!
//! These functions expose the individual stages behind [`crate::Detector`]:
//! shape classification, ring sampling and decoding, target classification
//! and proximity deduplication. Most users should prefer `Detector`.

pub use crate::classify::{classify_rad, classify_small, is_rad_code, is_small_target};
pub use crate::decode::{decode_rings, decode_samples, split_segments};
pub use crate::dedup::{remove_near_rad, KdTree};
pub use crate::geometry::{fit_ellipse, point_in_polygon, polygon_area, FIT_ANGLE_OFFSET_DEG};
pub use crate::ring::{binarize, sample_ring, RingSamples};
#[cfg(feature = "rayon")]
pub use crate::shapes::classify_shapes_par;
pub use crate::shapes::{classify_contour, classify_shapes, ContourShapes, Shapes};
