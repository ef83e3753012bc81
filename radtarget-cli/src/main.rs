use clap::Parser;
use radtarget::io::load_gray_image;
use radtarget::{
    threshold, ClassifyConfig, DecodeConfig, DetectConfig, Detection, Detector, RingCode,
    RingConfig, ShapeConfig, Target, ThresholdMode,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "RAD target detector (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output of the detection stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum ThresholdConfig {
    None,
    Fixed { level: u8 },
    Otsu,
    Adaptive { block_radius: u32, offset: i16 },
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        match ThresholdMode::default() {
            ThresholdMode::Adaptive {
                block_radius,
                offset,
            } => Self::Adaptive {
                block_radius,
                offset,
            },
            ThresholdMode::Fixed(level) => Self::Fixed { level },
            ThresholdMode::Otsu => Self::Otsu,
            ThresholdMode::None => Self::None,
        }
    }
}

impl From<ThresholdConfig> for ThresholdMode {
    fn from(value: ThresholdConfig) -> Self {
        match value {
            ThresholdConfig::None => ThresholdMode::None,
            ThresholdConfig::Fixed { level } => ThresholdMode::Fixed(level),
            ThresholdConfig::Otsu => ThresholdMode::Otsu,
            ThresholdConfig::Adaptive {
                block_radius,
                offset,
            } => ThresholdMode::Adaptive {
                block_radius,
                offset,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ShapesJson {
    epsilon: f64,
    min_area: f64,
    max_area: f64,
    min_hull_points: usize,
}

impl Default for ShapesJson {
    fn default() -> Self {
        let cfg = ShapeConfig::default();
        Self {
            epsilon: cfg.epsilon,
            min_area: cfg.min_area,
            max_area: cfg.max_area,
            min_hull_points: cfg.min_hull_points,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DecodeJson {
    outer_scale: f64,
    inner_scale: f64,
    samples: usize,
    binarize_fraction: f64,
}

impl Default for DecodeJson {
    fn default() -> Self {
        let cfg = DecodeConfig::default();
        Self {
            outer_scale: cfg.outer_scale,
            inner_scale: cfg.inner_scale,
            samples: cfg.ring.samples,
            binarize_fraction: cfg.ring.binarize_fraction,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ClassifyJson {
    sync_pattern: String,
    min_radius_ratio: f64,
    max_radius_ratio: f64,
}

impl Default for ClassifyJson {
    fn default() -> Self {
        let cfg = ClassifyConfig::default();
        Self {
            sync_pattern: cfg.sync_pattern.to_string(),
            min_radius_ratio: cfg.min_radius_ratio,
            max_radius_ratio: cfg.max_radius_ratio,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    output_path: Option<String>,
    threshold: ThresholdConfig,
    shapes: ShapesJson,
    decode: DecodeJson,
    classify: ClassifyJson,
    parallel: bool,
}

impl Config {
    fn detect_config(&self) -> Result<DetectConfig, Box<dyn std::error::Error>> {
        let sync_pattern: RingCode = self.classify.sync_pattern.parse()?;
        Ok(DetectConfig {
            shapes: ShapeConfig {
                epsilon: self.shapes.epsilon,
                min_area: self.shapes.min_area,
                max_area: self.shapes.max_area,
                min_hull_points: self.shapes.min_hull_points,
            },
            decode: DecodeConfig {
                outer_scale: self.decode.outer_scale,
                inner_scale: self.decode.inner_scale,
                ring: RingConfig {
                    samples: self.decode.samples,
                    binarize_fraction: self.decode.binarize_fraction,
                },
            },
            classify: ClassifyConfig {
                sync_pattern,
                min_radius_ratio: self.classify.min_radius_ratio,
                max_radius_ratio: self.classify.max_radius_ratio,
            },
            parallel: self.parallel,
        })
    }
}

#[derive(Debug, Serialize)]
struct EllipseRecord {
    cx: f64,
    cy: f64,
    major: f64,
    minor: f64,
    angle_deg: f64,
}

#[derive(Debug, Serialize)]
struct TargetRecord {
    x: f64,
    y: f64,
    kind: &'static str,
    code: String,
    ellipse: EllipseRecord,
}

impl From<&Target> for TargetRecord {
    fn from(value: &Target) -> Self {
        let [x, y] = value.center();
        let e = value.ellipse();
        Self {
            x,
            y,
            kind: value.kind().as_str(),
            code: value.code_str(),
            ellipse: EllipseRecord {
                cx: e.center()[0],
                cy: e.center()[1],
                major: e.major(),
                minor: e.minor(),
                angle_deg: e.angle_deg(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    width: usize,
    height: usize,
    ellipses_considered: usize,
    squares_considered: usize,
    rad_targets: Vec<TargetRecord>,
    small_targets: Vec<TargetRecord>,
}

impl Output {
    fn new(width: usize, height: usize, detection: &Detection) -> Self {
        Self {
            width,
            height,
            ellipses_considered: detection.ellipses_considered,
            squares_considered: detection.squares_considered,
            rad_targets: detection.rad_targets.iter().map(TargetRecord::from).collect(),
            small_targets: detection
                .small_targets
                .iter()
                .map(TargetRecord::from)
                .collect(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("radtarget=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }
    let detector = Detector::with_config(config.detect_config()?)?;

    let image = load_gray_image(&config.image_path)?;
    tracing::info!(
        path = %config.image_path,
        width = image.width(),
        height = image.height(),
        "loaded image"
    );
    let mode = ThresholdMode::from(config.threshold);
    let binary = threshold(image.view(), mode)?;
    let detection = detector.detect(binary.view())?;
    for target in detection.rad_targets.iter().chain(&detection.small_targets) {
        tracing::info!("{target}");
    }

    let output = Output::new(image.width(), image.height(), &detection);
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
