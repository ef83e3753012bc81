//! Image views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. Ring sampling reads
//! through `sample_or_zero`, which treats anything outside the image as
//! background.

use crate::util::{RadTargetError, RadTargetResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> RadTargetResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> RadTargetResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(RadTargetError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

impl ImageView<'_, u8> {
    /// Reads the pixel at signed coordinates, returning 0 outside the image.
    #[inline]
    pub fn sample_or_zero(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 {
            return 0;
        }
        self.get(x as usize, y as usize).copied().unwrap_or(0)
    }

    /// Copies the view into an `image::GrayImage` for the contour backend.
    pub fn to_gray_image(&self) -> RadTargetResult<image::GrayImage> {
        let owned = OwnedImage::from_view(*self)?;
        owned.into_gray_image()
    }
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous buffer of exactly `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> RadTargetResult<Self> {
        if width == 0 || height == 0 {
            return Err(RadTargetError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(RadTargetError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(RadTargetError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(RadTargetError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a (possibly strided) view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, u8>) -> RadTargetResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = view.row(y).ok_or(RadTargetError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.data.len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Takes ownership of an `image::GrayImage` buffer.
    pub fn from_gray_image(img: image::GrayImage) -> RadTargetResult<Self> {
        let width = img.width() as usize;
        let height = img.height() as usize;
        Self::new(img.into_raw(), width, height)
    }

    /// Converts into an `image::GrayImage` without copying.
    pub fn into_gray_image(self) -> RadTargetResult<image::GrayImage> {
        let (width, height) = (self.width, self.height);
        let w = u32::try_from(width).map_err(|_| RadTargetError::InvalidDimensions { width, height })?;
        let h = u32::try_from(height).map_err(|_| RadTargetError::InvalidDimensions { width, height })?;
        image::GrayImage::from_raw(w, h, self.data)
            .ok_or(RadTargetError::InvalidDimensions { width, height })
    }

    /// Returns a borrowed view of the buffer.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the raw row-major pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> RadTargetResult<usize> {
    if width == 0 || height == 0 {
        return Err(RadTargetError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(RadTargetError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(RadTargetError::InvalidDimensions { width, height })?;
    Ok(needed)
}

#[cfg(test)]
mod tests {
    use super::{ImageView, OwnedImage};

    #[test]
    fn sample_or_zero_masks_out_of_bounds() {
        let data = [1u8, 2, 3, 4];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        assert_eq!(view.sample_or_zero(1, 1), 4);
        assert_eq!(view.sample_or_zero(-1, 0), 0);
        assert_eq!(view.sample_or_zero(0, 2), 0);
        assert_eq!(view.sample_or_zero(2, 0), 0);
    }

    #[test]
    fn owned_from_strided_view_drops_padding() {
        let data = [1u8, 2, 99, 3, 4, 99];
        let view = ImageView::new(&data, 2, 2, 3).unwrap();
        let owned = OwnedImage::from_view(view).unwrap();
        assert_eq!(owned.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn gray_image_round_trip_keeps_layout() {
        let owned = OwnedImage::new(vec![0, 10, 20, 30, 40, 50], 3, 2).unwrap();
        let gray = owned.clone().into_gray_image().unwrap();
        assert_eq!(gray.get_pixel(2, 1).0[0], 50);
        assert_eq!(OwnedImage::from_gray_image(gray).unwrap(), owned);
    }
}
