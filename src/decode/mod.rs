//! Two-ring code decoding.
//!
//! A RAD target carries two concentric rings of 12 angular segments. The
//! outer ring holds the synchronization pattern, a single dark segment that
//! marks where reading starts; the inner ring holds the data bits. Both are
//! sampled on scaled copies of the fitted ellipse, rotated to the first dark
//! outer sample and cut into 12 segments whose medians give the bits.

mod code;

pub use code::{ParseRingCodeError, RingCode};

use crate::geometry::Ellipse;
use crate::image::ImageView;
use crate::ring::{sample_ring, RingConfig, RingSamples, ON, OFF};
use crate::trace::trace_reject;
use crate::util::math::median_u8;
use crate::util::{RadTargetError, RadTargetResult};

/// Display form of a ring that could not be decoded.
pub const SENTINEL_CODE: &str = "999999999999";

/// Number of angular segments per ring.
pub const SEGMENTS: usize = RingCode::BITS;

/// Parameters of ring decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeConfig {
    /// Scale of the synchronization ring relative to the fitted ellipse.
    pub outer_scale: f64,
    /// Scale of the data ring relative to the fitted ellipse.
    pub inner_scale: f64,
    /// Sampling of both rings.
    pub ring: RingConfig,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            outer_scale: 0.85,
            inner_scale: 0.6,
            ring: RingConfig::default(),
        }
    }
}

impl DecodeConfig {
    /// Checks ranges of all fields.
    pub fn validate(&self) -> RadTargetResult<()> {
        for scale in [self.outer_scale, self.inner_scale] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(RadTargetError::InvalidConfig {
                    reason: "decode ring scales must be finite and > 0",
                });
            }
        }
        self.ring.validate()
    }
}

/// Outcome of decoding the two rings of one ellipse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingDecode {
    /// Both rings were read starting from the first dark outer sample.
    Decoded { outer: RingCode, inner: RingCode },
    /// The outer ring has no dark sample, so there is no start position.
    Ambiguous,
}

impl RingDecode {
    /// Outer code, if decoded.
    pub fn outer(&self) -> Option<RingCode> {
        match self {
            Self::Decoded { outer, .. } => Some(*outer),
            Self::Ambiguous => None,
        }
    }

    /// Inner code, if decoded.
    pub fn inner(&self) -> Option<RingCode> {
        match self {
            Self::Decoded { inner, .. } => Some(*inner),
            Self::Ambiguous => None,
        }
    }

    /// Outer code as a bit string, or [`SENTINEL_CODE`].
    pub fn outer_str(&self) -> String {
        self.outer()
            .map_or_else(|| SENTINEL_CODE.to_owned(), |code| code.to_string())
    }

    /// Inner code as a bit string, or [`SENTINEL_CODE`].
    pub fn inner_str(&self) -> String {
        self.inner()
            .map_or_else(|| SENTINEL_CODE.to_owned(), |code| code.to_string())
    }
}

/// Half-open index ranges splitting `len` items into `parts` contiguous runs.
///
/// The first `len % parts` runs are one item longer than the rest; when
/// `len < parts` the trailing runs are empty.
pub fn split_segments(len: usize, parts: usize) -> Vec<std::ops::Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }
    let base = len / parts;
    let extra = len % parts;
    let mut start = 0;
    (0..parts)
        .map(|k| {
            let size = base + usize::from(k < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Samples and decodes both rings of `ellipse`.
pub fn decode_rings(image: ImageView<'_, u8>, ellipse: &Ellipse, cfg: &DecodeConfig) -> RingDecode {
    let outer = sample_ring(image, &ellipse.scaled(cfg.outer_scale), &cfg.ring);
    let inner = sample_ring(image, &ellipse.scaled(cfg.inner_scale), &cfg.ring);
    let decode = decode_samples(&outer, &inner);
    if decode == RingDecode::Ambiguous {
        trace_reject!(
            "ring_without_sync",
            cx = ellipse.center()[0],
            cy = ellipse.center()[1]
        );
    }
    decode
}

/// Decodes already sampled rings of equal length.
pub fn decode_samples(outer: &RingSamples, inner: &RingSamples) -> RingDecode {
    let Some(start) = outer.values.iter().position(|&v| v == OFF) else {
        return RingDecode::Ambiguous;
    };
    RingDecode::Decoded {
        outer: read_code(&outer.values, start),
        inner: read_code(&inner.values, start),
    }
}

fn read_code(values: &[u8], start: usize) -> RingCode {
    let mut rolled = Vec::with_capacity(values.len());
    let start = start.min(values.len());
    rolled.extend_from_slice(&values[start..]);
    rolled.extend_from_slice(&values[..start]);

    let mut code = RingCode::ZERO;
    for (k, range) in split_segments(rolled.len(), SEGMENTS).into_iter().enumerate() {
        let bit = median_u8(&rolled[range]) == Some(f64::from(ON));
        code = code.with_bit(k, bit);
    }
    code
}
