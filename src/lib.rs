//! Pagemask: PAGE XML annotations to segmentation training data.
//!
//! Pagemask turns text-line annotations (baselines and line outlines stored
//! in PAGE XML next to each page image) into per-pixel label masks, and
//! splits the resulting image/mask pairs into train and eval sets.
//!
//! # Modules
//!
//! - [`page`]: PAGE XML model, reader and line geometry
//! - [`stats`]: outlier-robust statistics for line-height estimation
//! - [`mask`]: label mask rasterization
//! - [`classes`]: class table derivation (`classes.txt`)
//! - [`dataset`]: end-to-end training set generation
//! - [`manifest`]: headerless image/label CSV manifests
//! - [`split`]: seeded train/eval splitting
//! - [`config`]: build configuration
//! - [`error`]: Error types for pagemask operations

pub mod classes;
pub mod config;
pub mod dataset;
pub mod error;
pub mod manifest;
pub mod mask;
pub mod page;
pub mod split;
pub mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use config::BuildConfig;
pub use error::PagemaskError;

/// The pagemask CLI application.
#[derive(Parser)]
#[command(name = "pagemask")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate images, label masks, classes.txt and set_data.csv.
    Build(BuildArgs),
    /// Split a set_data.csv manifest into eval_data.csv and train_data.csv.
    Split(SplitArgs),
}

/// Arguments for the build subcommand.
#[derive(clap::Args)]
struct BuildArgs {
    /// Input directory with page images and their page/ folders.
    input: PathBuf,

    /// Output directory.
    output: PathBuf,

    /// YAML file with build options; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target pixel count of resized outputs (aspect ratio is kept).
    #[arg(long, visible_alias = "target-pixel-budget", conflicts_with = "max_dimension")]
    size: Option<u64>,

    /// Longest side of resized outputs; smaller images are kept as they are.
    #[arg(long)]
    max_dimension: Option<u32>,

    /// What the label masks encode ('lines' or 'regions').
    #[arg(long, value_enum)]
    mask_mode: Option<mask::MaskMode>,

    /// Append multilabel presence bits to classes.txt rows.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    multilabel: Option<bool>,

    /// Draw baselines into the red channel.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    draw_baselines: Option<bool>,

    /// Fill line outlines into the green channel.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    draw_lines: Option<bool>,

    /// Mark baseline endpoints in the blue channel.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    draw_endpoints: Option<bool>,

    /// Baseline thickness as a fraction of the mean line height.
    #[arg(long, visible_alias = "baseline-thickness")]
    baseline_thickness_fraction: Option<f64>,

    /// Endpoint marker diameter (pixels at a 1100 px page height).
    #[arg(long)]
    endpoint_diameter: Option<u32>,

    /// Output naming scheme.
    #[arg(long, value_enum)]
    naming: Option<dataset::NamingScheme>,

    /// Exit non-zero if any image failed.
    #[arg(long)]
    strict: bool,

    /// Report format ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

impl BuildArgs {
    fn resolve_config(&self) -> Result<BuildConfig, PagemaskError> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::from_yaml_file(path)?,
            None => BuildConfig::default(),
        };

        if let Some(size) = self.size {
            config.target_pixel_budget = Some(size);
            config.max_dimension = None;
        }
        if let Some(side) = self.max_dimension {
            config.max_dimension = Some(side);
            config.target_pixel_budget = None;
        }
        if let Some(mode) = self.mask_mode {
            config.mask_mode = mode;
        }
        if let Some(multilabel) = self.multilabel {
            config.multilabel = multilabel;
        }
        if let Some(draw) = self.draw_baselines {
            config.draw_baselines = draw;
        }
        if let Some(draw) = self.draw_lines {
            config.draw_lines = draw;
        }
        if let Some(draw) = self.draw_endpoints {
            config.draw_endpoints = draw;
        }
        if let Some(fraction) = self.baseline_thickness_fraction {
            config.baseline_thickness_fraction = fraction;
        }
        if let Some(diameter) = self.endpoint_diameter {
            config.endpoint_diameter = diameter;
        }
        if let Some(naming) = self.naming {
            config.naming = naming;
        }

        Ok(config)
    }
}

/// Arguments for the split subcommand.
#[derive(clap::Args)]
struct SplitArgs {
    /// Manifest to split (two columns, no header).
    manifest: PathBuf,

    /// Share of rows drawn into the eval set.
    #[arg(long, default_value_t = split::DEFAULT_EVAL_FRACTION)]
    fraction: f64,

    /// Random seed.
    #[arg(long, default_value_t = split::DEFAULT_SEED)]
    seed: u64,
}

/// Run the pagemask CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PagemaskError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Build(args)) => run_build(args),
        Some(Commands::Split(args)) => run_split(args),
        None => {
            println!("pagemask {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("PAGE XML annotations to segmentation training data.");
            println!();
            println!("Run 'pagemask --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the build subcommand.
fn run_build(args: BuildArgs) -> Result<(), PagemaskError> {
    let config = args.resolve_config()?;
    let report = dataset::build_dataset(&args.input, &args.output, &config)?;

    match args.report.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report).map_err(|e| {
                PagemaskError::InvalidOptions {
                    message: format!("failed to render JSON report: {e}"),
                }
            })?;
            println!("{json}");
        }
        "text" => print!("{report}"),
        other => {
            return Err(PagemaskError::InvalidOptions {
                message: format!("unsupported report format '{other}' (supported: text, json)"),
            });
        }
    }

    if args.strict && !report.is_complete() {
        return Err(PagemaskError::BuildFailed {
            failed: report.failure_count(),
            total: report.images_found,
        });
    }

    Ok(())
}

/// Execute the split subcommand.
fn run_split(args: SplitArgs) -> Result<(), PagemaskError> {
    let opts = split::SplitOptions {
        fraction: args.fraction,
        seed: args.seed,
    };
    let output = split::split_manifest_file(&args.manifest, &opts)?;

    println!(
        "Wrote {} eval row(s) to {}",
        output.eval_rows,
        output.eval_path.display()
    );
    println!(
        "Wrote {} train row(s) to {}",
        output.train_rows,
        output.train_path.display()
    );
    Ok(())
}
