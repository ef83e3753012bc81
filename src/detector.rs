//! End-to-end detection pipeline.

use crate::classify::{classify_rad, classify_small, ClassifyConfig, Target};
use crate::decode::{decode_rings, DecodeConfig, RingDecode};
use crate::dedup::remove_near_rad;
use crate::geometry::Ellipse;
use crate::image::ImageView;
use crate::preprocess::{extract_contours, Contour};
use crate::shapes::{classify_shapes, ContourOps, ImageprocOps, ShapeConfig};
use crate::trace::{trace_event, trace_span};
use crate::util::{RadTargetError, RadTargetResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Configuration of the whole detection pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectConfig {
    pub shapes: ShapeConfig,
    pub decode: DecodeConfig,
    pub classify: ClassifyConfig,
    /// Classify contours and decode rings on the rayon pool. Ignored unless
    /// the `rayon` feature is enabled; results are identical either way.
    pub parallel: bool,
}

impl DetectConfig {
    /// Validates every stage configuration.
    pub fn validate(&self) -> RadTargetResult<()> {
        self.shapes.validate()?;
        self.decode.validate()?;
        self.classify.validate()
    }
}

/// Targets found in one image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detection {
    /// Coded targets in ellipse order.
    pub rad_targets: Vec<Target>,
    /// Uncoded targets in (square, ellipse) order, minus those near a coded target.
    pub small_targets: Vec<Target>,
    /// Number of fitted ellipses fed to the decoder.
    pub ellipses_considered: usize,
    /// Number of square frames found.
    pub squares_considered: usize,
}

/// Detector for coded and uncoded targets in a binary image.
#[derive(Clone, Debug)]
pub struct Detector<O: ContourOps = ImageprocOps> {
    config: DetectConfig,
    ops: O,
}

impl Detector<ImageprocOps> {
    /// Detector with the default configuration.
    pub fn new() -> Self {
        Self {
            config: DetectConfig::default(),
            ops: ImageprocOps,
        }
    }

    /// Detector with a validated configuration.
    pub fn with_config(config: DetectConfig) -> RadTargetResult<Self> {
        Self::with_ops(config, ImageprocOps)
    }
}

impl Default for Detector<ImageprocOps> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ContourOps + Sync> Detector<O> {
    /// Detector with a custom contour backend.
    pub fn with_ops(config: DetectConfig, ops: O) -> RadTargetResult<Self> {
        config.validate()?;
        Ok(Self { config, ops })
    }

    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Extracts contours from `image` and runs the pipeline on them.
    ///
    /// `image` must already be binarized to 0/255.
    pub fn detect(&self, image: ImageView<'_, u8>) -> RadTargetResult<Detection> {
        let contours = extract_contours(image)?;
        self.detect_with_contours(image, &contours)
    }

    /// Runs the pipeline on contours extracted by the caller.
    pub fn detect_with_contours(
        &self,
        image: ImageView<'_, u8>,
        contours: &[Contour],
    ) -> RadTargetResult<Detection> {
        if image.width() == 0 || image.height() == 0 {
            return Err(RadTargetError::InvalidDimensions {
                width: image.width(),
                height: image.height(),
            });
        }
        let _span = trace_span!(
            "detect",
            width = image.width(),
            height = image.height(),
            contours = contours.len()
        )
        .entered();

        let shapes = self.classify_contours(contours);
        let decodes = self.decode_all(image, &shapes.ellipses);

        let rad_targets = classify_rad(&shapes.ellipses, &decodes, &self.config.classify);
        let small = classify_small(&shapes.squares, &shapes.ellipses, &self.config.classify);
        let small_targets = remove_near_rad(small, &rad_targets);

        trace_event!(
            "detect_done",
            rad = rad_targets.len(),
            small = small_targets.len()
        );
        Ok(Detection {
            rad_targets,
            small_targets,
            ellipses_considered: shapes.ellipses.len(),
            squares_considered: shapes.squares.len(),
        })
    }

    fn classify_contours(&self, contours: &[Contour]) -> crate::shapes::Shapes {
        #[cfg(feature = "rayon")]
        if self.config.parallel {
            return crate::shapes::classify_shapes_par(contours, &self.ops, &self.config.shapes);
        }
        classify_shapes(contours, &self.ops, &self.config.shapes)
    }

    fn decode_all(&self, image: ImageView<'_, u8>, ellipses: &[Ellipse]) -> Vec<RingDecode> {
        let _span = trace_span!("decode_rings", ellipses = ellipses.len()).entered();
        let cfg = &self.config.decode;
        #[cfg(feature = "rayon")]
        if self.config.parallel {
            return ellipses
                .par_iter()
                .map(|ellipse| decode_rings(image, ellipse, cfg))
                .collect();
        }
        ellipses
            .iter()
            .map(|ellipse| decode_rings(image, ellipse, cfg))
            .collect()
    }
}
