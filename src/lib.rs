//! radtarget detects circular photogrammetry targets in binary images.
//!
//! Two kinds of target are recognised: coded RAD targets, whose outer ring
//! carries a fixed synchronization pattern and whose inner ring carries 12
//! data bits, and small uncoded dots centred inside a square frame. The
//! pipeline fits ellipses and squares to contours, samples the rings of every
//! ellipse, classifies targets and finally drops dots that belong to a coded
//! target. Contour work runs on `imageproc`; parallelism is available via the
//! `rayon` feature.

pub mod classify;
pub mod decode;
pub mod dedup;
mod detector;
pub mod geometry;
pub mod image;
pub mod lowlevel;
pub mod preprocess;
pub mod ring;
pub mod shapes;
mod trace;
pub mod util;

pub use classify::{ClassifyConfig, Target, TargetKind};
pub use decode::{DecodeConfig, RingCode, RingDecode, SENTINEL_CODE};
pub use detector::{DetectConfig, Detection, Detector};
pub use geometry::{Ellipse, Square};
pub use self::image::{ImageView, OwnedImage};
pub use preprocess::{extract_contours, threshold, Contour, ThresholdMode};
pub use ring::RingConfig;
pub use shapes::{ContourOps, ImageprocOps, ShapeConfig};
pub use util::{RadTargetError, RadTargetResult};

#[cfg(feature = "image-io")]
pub use self::image::io;
