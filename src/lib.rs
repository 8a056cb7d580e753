//! Facecrop: region-aware crop planning for thumbnails.
//!
//! Facecrop takes the regions an external detector found in an image
//! (usually faces), combines them into one bounding box and plans a crop
//! that keeps every region in frame while matching a requested output
//! geometry such as `1600x900#`. Image decoding and detection happen
//! elsewhere; the crate only reads image dimensions from file headers.
//!
//! # Modules
//!
//! - [`geometry`]: points, rectangles, sizes and target geometries
//! - [`region`]: detected regions and their aggregation into a bounding box
//! - [`planner`]: the aspect-pad / scale-out / crop-and-resize planner
//! - [`detect`]: the detector trait, built-in detectors and their registry
//! - [`config`]: configuration files
//! - [`pipeline`]: detect, aggregate and plan for one image
//! - [`imageop`]: applying a plan with ImageMagick
//! - [`report`]: text and JSON reports
//! - [`error`]: error types

pub mod config;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod imageop;
pub mod pipeline;
pub mod planner;
pub mod region;
pub mod report;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use walkdir::WalkDir;

pub use config::{Config, DetectorSpec};
pub use error::FaceCropError;
pub use geometry::TargetGeometry;
pub use pipeline::{FaceCrop, Outcome};

use detect::Registry;
use imageop::{ImageMagick, ImageOperation};
use report::PlanReport;

const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

/// The facecrop CLI application.
#[derive(Parser)]
#[command(name = "facecrop")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Plan the crop for one image and print it.
    Plan(PlanArgs),
    /// Crop and resize one image with ImageMagick.
    Apply(ApplyArgs),
    /// Plan every image under a directory.
    Batch(BatchArgs),
    /// List the available detectors.
    Detectors,
}

/// Options shared by every subcommand that runs the pipeline.
#[derive(clap::Args)]
struct PipelineArgs {
    /// Output geometry: 'WxH' to fit, 'WxH#' to crop to fill.
    #[arg(long)]
    target: TargetGeometry,

    /// Configuration file (YAML or JSON).
    #[arg(long, env = "FACECROP_CONFIG")]
    config: Option<PathBuf>,

    /// Add a detector with default options (repeatable).
    #[arg(long = "detector", value_name = "NAME")]
    detectors: Vec<String>,

    /// Maximum scale-out factor (>= 1.0).
    #[arg(long)]
    max_scale_out: Option<f64>,

    /// Write a region overlay next to each output.
    #[arg(long)]
    debug: bool,
}

/// Arguments for the plan subcommand.
#[derive(clap::Args)]
struct PlanArgs {
    /// Input image.
    image: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the apply subcommand.
#[derive(clap::Args)]
struct ApplyArgs {
    /// Input image.
    image: PathBuf,

    /// Output image.
    dest: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Print the ImageMagick command lines instead of running them.
    #[arg(long)]
    dry_run: bool,

    /// ImageMagick program to run.
    #[arg(long, value_name = "PROGRAM", default_value = "convert")]
    convert: PathBuf,
}

/// Arguments for the batch subcommand.
#[derive(clap::Args)]
struct BatchArgs {
    /// Directory to walk for images.
    dir: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Output format ('text', or 'json' for one JSON object per line).
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the facecrop CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), FaceCropError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Plan(args)) => run_plan(args),
        Some(Commands::Apply(args)) => run_apply(args),
        Some(Commands::Batch(args)) => run_batch(args),
        Some(Commands::Detectors) => run_detectors(),
        None => {
            println!("facecrop {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Region-aware crop planning.");
            println!();
            println!("Run 'facecrop --help' for usage information.");
            Ok(())
        }
    }
}

/// Loads the configuration file (if any) and applies command-line overrides.
fn build_config(args: &PipelineArgs) -> Result<Config, FaceCropError> {
    let mut config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    config.detectors.extend(
        args.detectors
            .iter()
            .map(|name| DetectorSpec::new(name.as_str(), serde_json::Value::Null)),
    );
    if let Some(max_scale_out) = args.max_scale_out {
        config.max_scale_out = max_scale_out;
    }
    config.debug |= args.debug;

    Ok(config)
}

fn build_pipeline(args: &PipelineArgs) -> Result<FaceCrop, FaceCropError> {
    let config = build_config(args)?;
    FaceCrop::new(&config, &Registry::builtin())
}

fn check_output_format(output: &str) -> Result<(), FaceCropError> {
    match output {
        "text" | "json" => Ok(()),
        other => Err(FaceCropError::UnsupportedFormat(format!(
            "'{other}' (supported: text, json)"
        ))),
    }
}

/// Execute the plan subcommand.
fn run_plan(args: PlanArgs) -> Result<(), FaceCropError> {
    check_output_format(&args.output)?;
    let pipeline = build_pipeline(&args.pipeline)?;
    let target = args.pipeline.target;

    let outcome = pipeline.process(&args.image, &target)?;
    let report = PlanReport::new(&args.image, target, outcome);

    if args.output == "json" {
        let json = serde_json::to_string_pretty(&report).map_err(FaceCropError::JsonWrite)?;
        println!("{json}");
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Execute the apply subcommand.
fn run_apply(args: ApplyArgs) -> Result<(), FaceCropError> {
    let pipeline = build_pipeline(&args.pipeline)?;
    let target = args.pipeline.target;
    let outcome = pipeline.process(&args.image, &target)?;

    let magick = ImageMagick::new(args.convert.as_os_str());
    let crop = outcome.crop();
    let debug_dest = imageop::debug_path(&args.dest);
    let draw_overlay = pipeline.debug() && !outcome.regions().is_empty();

    if args.dry_run {
        if draw_overlay {
            let draw = imageop::draw_args(&args.image, outcome.regions(), &debug_dest);
            println!("{}", imageop::render_command(magick.program(), &draw));
        }
        let convert = imageop::convert_args(&args.image, crop.as_ref(), outcome.resize(), &args.dest);
        println!("{}", imageop::render_command(magick.program(), &convert));
        return Ok(());
    }

    if draw_overlay {
        let written = magick.draw_regions(&args.image, outcome.regions(), &debug_dest)?;
        tracing::info!(path = %written.display(), "wrote region overlay");
    }
    let written = magick.apply(&args.image, crop.as_ref(), outcome.resize(), &args.dest)?;
    println!("Wrote {}", written.display());
    Ok(())
}

/// Execute the batch subcommand.
fn run_batch(args: BatchArgs) -> Result<(), FaceCropError> {
    check_output_format(&args.output)?;
    let pipeline = build_pipeline(&args.pipeline)?;
    let target = args.pipeline.target;

    let images = collect_images(&args.dir)?;
    let mut failed = 0usize;

    for image in &images {
        match pipeline.process(image, &target) {
            Ok(outcome) => {
                let report = PlanReport::new(image, target, outcome);
                if args.output == "json" {
                    let line = serde_json::to_string(&report).map_err(FaceCropError::JsonWrite)?;
                    println!("{line}");
                } else {
                    print!("{report}");
                }
            }
            Err(err) => {
                failed += 1;
                tracing::warn!(image = %image.display(), error = %err, "skipping image");
                eprintln!("{}: {err}", image.display());
            }
        }
    }

    if failed > 0 {
        return Err(FaceCropError::BatchFailed {
            failed,
            total: images.len(),
        });
    }
    Ok(())
}

/// Execute the detectors subcommand.
fn run_detectors() -> Result<(), FaceCropError> {
    for name in Registry::builtin().names() {
        println!("{name}");
    }
    Ok(())
}

/// Image files under `root`, sorted by path.
fn collect_images(root: &Path) -> Result<Vec<PathBuf>, FaceCropError> {
    let mut images = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| FaceCropError::Io(source.into()))?;
        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            images.push(entry.path().to_path_buf());
        }
    }

    Ok(images)
}

fn has_image_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}
