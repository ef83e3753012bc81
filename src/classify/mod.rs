//! Target classification from decoded ellipses and square frames.
//!
//! Coded targets are recognised by their rings alone. Uncoded targets need a
//! square frame around a circle of plausible size; frames and circles are
//! paired exhaustively, square-major.

mod target;

pub use target::{Target, TargetKind};

use crate::decode::{RingCode, RingDecode};
use crate::geometry::{Ellipse, Square};
use crate::trace::{trace_event, trace_span};
use crate::util::{RadTargetError, RadTargetResult};

/// Parameters of target classification.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifyConfig {
    /// Outer ring code that marks a coded target.
    pub sync_pattern: RingCode,
    /// Exclusive lower bound of `Ma/2` relative to the frame's long side.
    pub min_radius_ratio: f64,
    /// Exclusive upper bound of `Ma/2` relative to the frame's long side.
    pub max_radius_ratio: f64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            sync_pattern: RingCode::SYNC,
            min_radius_ratio: 0.15,
            max_radius_ratio: 0.5,
        }
    }
}

impl ClassifyConfig {
    /// Checks ranges of all fields.
    pub fn validate(&self) -> RadTargetResult<()> {
        if !self.min_radius_ratio.is_finite()
            || !self.max_radius_ratio.is_finite()
            || self.min_radius_ratio < 0.0
        {
            return Err(RadTargetError::InvalidConfig {
                reason: "classify radius ratios must be finite and non-negative",
            });
        }
        if self.max_radius_ratio <= self.min_radius_ratio {
            return Err(RadTargetError::InvalidConfig {
                reason: "classify.max_radius_ratio must exceed min_radius_ratio",
            });
        }
        Ok(())
    }
}

/// True if the decoded rings describe a coded target.
///
/// The outer ring must equal the sync pattern exactly; the inner code must
/// start with `1` and must not be all ones.
pub fn is_rad_code(decode: &RingDecode, cfg: &ClassifyConfig) -> bool {
    match decode {
        RingDecode::Decoded { outer, inner } => {
            *outer == cfg.sync_pattern && inner.starts_with_one() && !inner.is_all_ones()
        }
        RingDecode::Ambiguous => false,
    }
}

/// Coded targets among `ellipses`, paired index-wise with `decodes`.
pub fn classify_rad(ellipses: &[Ellipse], decodes: &[RingDecode], cfg: &ClassifyConfig) -> Vec<Target> {
    let _span = trace_span!("classify_rad", ellipses = ellipses.len()).entered();
    let targets: Vec<Target> = ellipses
        .iter()
        .zip(decodes)
        .filter(|(_, decode)| is_rad_code(decode, cfg))
        .filter_map(|(ellipse, decode)| decode.inner().map(|code| Target::rad(*ellipse, code)))
        .collect();
    trace_event!("rad_targets", count = targets.len());
    targets
}

/// True if `ellipse` is a plausible dot inside `square`.
pub fn is_small_target(square: &Square, ellipse: &Ellipse, cfg: &ClassifyConfig) -> bool {
    let [cx, cy] = ellipse.center();
    if !square.contains_point(cx, cy) {
        return false;
    }
    let radius = ellipse.semi_major();
    let side = square.longside();
    cfg.min_radius_ratio * side < radius && radius < cfg.max_radius_ratio * side
}

/// Uncoded targets over all (square, ellipse) pairs, square-major.
///
/// An ellipse inside several frames yields one target per frame.
pub fn classify_small(squares: &[Square], ellipses: &[Ellipse], cfg: &ClassifyConfig) -> Vec<Target> {
    let _span = trace_span!(
        "classify_small",
        squares = squares.len(),
        ellipses = ellipses.len()
    )
    .entered();
    let targets: Vec<Target> = squares
        .iter()
        .flat_map(|square| {
            ellipses
                .iter()
                .filter(move |ellipse| is_small_target(square, ellipse, cfg))
                .map(|ellipse| Target::circle(*ellipse))
        })
        .collect();
    trace_event!("small_targets", count = targets.len());
    targets
}
