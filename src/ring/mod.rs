//! Intensity sampling along elliptical rings.
//!
//! Samples are taken at evenly spaced parametric angles, rounded to the
//! nearest pixel and binarized against a fraction of the ring's own maximum.
//! The per-ring threshold keeps differently lit targets comparable.

use crate::geometry::Ellipse;
use crate::image::ImageView;
use crate::util::{RadTargetError, RadTargetResult};

/// Value of an "on" sample after binarization.
pub const ON: u8 = 255;
/// Value of an "off" sample after binarization.
pub const OFF: u8 = 0;

/// Parameters of ring sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct RingConfig {
    /// Number of samples around the ring.
    pub samples: usize,
    /// Samples strictly above `binarize_fraction * max` are on.
    pub binarize_fraction: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            samples: 200,
            binarize_fraction: 0.25,
        }
    }
}

impl RingConfig {
    /// Checks ranges of all fields.
    pub fn validate(&self) -> RadTargetResult<()> {
        if self.samples == 0 {
            return Err(RadTargetError::InvalidConfig {
                reason: "ring.samples must be > 0",
            });
        }
        if !(0.0..1.0).contains(&self.binarize_fraction) {
            return Err(RadTargetError::InvalidConfig {
                reason: "ring.binarize_fraction must be in [0, 1)",
            });
        }
        Ok(())
    }
}

/// Binarized samples along one ring; all three vectors share a length.
#[derive(Clone, Debug, PartialEq)]
pub struct RingSamples {
    /// Rounded pixel coordinates `[x, y]` of each sample.
    pub points: Vec<[i64; 2]>,
    /// Parametric angle of each sample in radians, increasing from 0.
    pub angles: Vec<f64>,
    /// [`ON`] or [`OFF`] per sample.
    pub values: Vec<u8>,
}

impl RingSamples {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no samples were taken.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Samples `image` along `ellipse` and binarizes the result.
///
/// Coordinates outside the image read as 0.
pub fn sample_ring(image: ImageView<'_, u8>, ellipse: &Ellipse, cfg: &RingConfig) -> RingSamples {
    let n = cfg.samples;
    let mut points = Vec::with_capacity(n);
    let mut angles = Vec::with_capacity(n);
    let mut raw = Vec::with_capacity(n);

    for i in 0..n {
        let theta = std::f64::consts::TAU * i as f64 / n as f64;
        let [x, y] = ellipse.point_at(theta);
        let px = [x.round() as i64, y.round() as i64];
        raw.push(image.sample_or_zero(px[0], px[1]));
        points.push(px);
        angles.push(theta);
    }

    RingSamples {
        points,
        angles,
        values: binarize(&raw, cfg.binarize_fraction),
    }
}

/// Maps values above `fraction * max(values)` to [`ON`], the rest to [`OFF`].
pub fn binarize(values: &[u8], fraction: f64) -> Vec<u8> {
    let max = values.iter().copied().max().unwrap_or(0);
    let level = fraction * f64::from(max);
    values
        .iter()
        .map(|&v| if f64::from(v) > level { ON } else { OFF })
        .collect()
}
