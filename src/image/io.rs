//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{RadTargetError, RadTargetResult};
use std::path::Path;

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> RadTargetResult<OwnedImage> {
    OwnedImage::from_gray_image(img.to_luma8())
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> RadTargetResult<OwnedImage> {
    let img = image::open(path).map_err(|err| RadTargetError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}
