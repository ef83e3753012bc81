//! Binarization and contour extraction backed by `imageproc`.
//!
//! These are the image-processing collaborators of the detector: the ring
//! sampler expects a 0/255 image, and the shape classifier consumes the
//! borders of its non-zero regions.

use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

use crate::image::{ImageView, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::RadTargetResult;

/// Binarization applied before contour extraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThresholdMode {
    /// Input is already binary; pixels are copied unchanged.
    None,
    /// Pixels strictly above the level become 255.
    Fixed(u8),
    /// Global Otsu level.
    Otsu,
    /// Local mean over a `(2r + 1)²` box; pixels above `mean - offset`
    /// become 255.
    Adaptive { block_radius: u32, offset: i16 },
}

impl Default for ThresholdMode {
    fn default() -> Self {
        Self::Adaptive {
            block_radius: 15,
            offset: 5,
        }
    }
}

/// One boundary curve of a region in the binary image.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    /// Boundary pixels in tracing order.
    pub points: Vec<Point<i32>>,
    /// True for the inner border of a hole.
    pub is_hole: bool,
}

impl Contour {
    /// Creates an outer contour from integer `(x, y)` pairs.
    pub fn from_xy(points: impl IntoIterator<Item = (i32, i32)>) -> Self {
        Self {
            points: points.into_iter().map(|(x, y)| Point::new(x, y)).collect(),
            is_hole: false,
        }
    }
}

impl From<imageproc::contours::Contour<i32>> for Contour {
    fn from(value: imageproc::contours::Contour<i32>) -> Self {
        Self {
            points: value.points,
            is_hole: value.border_type == BorderType::Hole,
        }
    }
}

/// Binarizes `image` to 0/255 according to `mode`.
pub fn threshold(image: ImageView<'_, u8>, mode: ThresholdMode) -> RadTargetResult<OwnedImage> {
    let owned = OwnedImage::from_view(image)?;
    let level = match mode {
        ThresholdMode::None => return Ok(owned),
        ThresholdMode::Fixed(level) => level,
        ThresholdMode::Otsu => {
            let gray = owned.clone().into_gray_image()?;
            imageproc::contrast::otsu_level(&gray)
        }
        ThresholdMode::Adaptive {
            block_radius,
            offset,
        } => {
            let gray = owned.clone().into_gray_image()?;
            let mean = imageproc::filter::box_filter(&gray, block_radius, block_radius);
            let data = owned
                .data()
                .iter()
                .zip(mean.as_raw())
                .map(|(&v, &m)| {
                    if i32::from(v) > i32::from(m) - i32::from(offset) {
                        255
                    } else {
                        0
                    }
                })
                .collect();
            return OwnedImage::new(data, owned.width(), owned.height());
        }
    };
    let data = owned
        .data()
        .iter()
        .map(|&v| if v > level { 255 } else { 0 })
        .collect();
    OwnedImage::new(data, owned.width(), owned.height())
}

/// Extracts outer and hole borders of all non-zero regions.
pub fn extract_contours(image: ImageView<'_, u8>) -> RadTargetResult<Vec<Contour>> {
    let _span = trace_span!("extract_contours").entered();
    let gray = image.to_gray_image()?;
    let contours: Vec<Contour> = find_contours::<i32>(&gray)
        .into_iter()
        .map(Contour::from)
        .collect();
    trace_event!("contours", count = contours.len());
    Ok(contours)
}

#[cfg(test)]
mod tests {
    use super::{extract_contours, threshold, ThresholdMode};
    use crate::image::ImageView;

    #[test]
    fn fixed_threshold_is_strict() {
        let data = [0u8, 99, 100, 101, 255, 7];
        let view = ImageView::from_slice(&data, 3, 2).unwrap();
        let out = threshold(view, ThresholdMode::Fixed(100)).unwrap();
        assert_eq!(out.data(), &[0, 0, 0, 255, 255, 0]);
    }

    #[test]
    fn none_copies_input() {
        let data = [3u8, 4, 5, 6];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        let out = threshold(view, ThresholdMode::None).unwrap();
        assert_eq!(out.data(), &data);
    }

    #[test]
    fn otsu_splits_bimodal_image() {
        let mut data = vec![20u8; 64];
        for v in data.iter_mut().skip(32) {
            *v = 220;
        }
        let view = ImageView::from_slice(&data, 8, 8).unwrap();
        let out = threshold(view, ThresholdMode::Otsu).unwrap();
        assert!(out.data()[..32].iter().all(|&v| v == 0));
        assert!(out.data()[32..].iter().all(|&v| v == 255));
    }

    #[test]
    fn ring_region_yields_outer_and_hole_borders() {
        let size = 20usize;
        let mut data = vec![0u8; size * size];
        for y in 4..16 {
            for x in 4..16 {
                let border = !(7..13).contains(&x) || !(7..13).contains(&y);
                if border {
                    data[y * size + x] = 255;
                }
            }
        }
        let view = ImageView::from_slice(&data, size, size).unwrap();
        let contours = extract_contours(view).unwrap();
        assert_eq!(contours.len(), 2);
        assert_eq!(contours.iter().filter(|c| c.is_hole).count(), 1);
    }
}
