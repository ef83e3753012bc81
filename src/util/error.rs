//! Error types for radtarget.

use thiserror::Error;

/// Result alias for radtarget operations.
pub type RadTargetResult<T> = std::result::Result<T, RadTargetError>;

/// Errors raised for invalid caller input.
///
/// Detection itself never fails on image content: undecodable rings,
/// rejected contours and out-of-bounds samples are absorbed by the stage
/// that meets them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RadTargetError {
    /// Image dimensions are zero or overflow.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than the image width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer cannot hold the requested image.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A configuration value is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Image decoding or file access failed.
    #[cfg(feature = "image-io")]
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
