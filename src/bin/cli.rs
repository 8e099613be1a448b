//! Command line front end for depthfocus.
//!
//! Subcommands:
//! - `estimate`: run the full pipeline over an image stack
//! - `probe`: print the focus score curve of one pixel
//! - `init-config`: write a default configuration file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use depthfocus::{
    DepthSession, ErrorStatistics, FilterType, FocusMeasureKind, PipelineConfig,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "depthfocus-cli")]
#[command(about = "Depth-from-focus estimation for focus-swept image stacks")]
#[command(version)]
struct Args {
    /// Pipeline configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate a depth map from an ordered image stack
    Estimate {
        /// Stack images, nearest focus first
        #[arg(required = true, num_args = 2..)]
        images: Vec<PathBuf>,

        /// Ground-truth depth map for error analysis
        #[arg(short, long)]
        reference: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,

        /// Filtered depth map output (float image, EXR by default)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Normalized 8-bit depth map output
        #[arg(long)]
        depth_png: Option<PathBuf>,

        /// Normalized 8-bit error map output
        #[arg(long)]
        error_png: Option<PathBuf>,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the focus scores of one pixel across the stack
    Probe {
        #[arg(required = true, num_args = 2..)]
        images: Vec<PathBuf>,

        #[arg(short)]
        x: usize,

        #[arg(short)]
        y: usize,

        #[command(flatten)]
        overrides: Overrides,

        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration
    InitConfig {
        /// Destination (defaults to ./depthfocus.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Command line overrides of configuration values
#[derive(clap::Args, Debug, Default)]
struct Overrides {
    /// Focus measure (gradient, variance)
    #[arg(long)]
    measure: Option<FocusMeasureKind>,

    /// Focus measure window size
    #[arg(long)]
    focus_kernel: Option<usize>,

    /// Gaussian pre-filter kernel size, 0 disables it
    #[arg(long)]
    pre_filter: Option<usize>,

    /// Depth of the first image
    #[arg(long)]
    initial_depth: Option<f32>,

    /// Depth step between images
    #[arg(long)]
    depth_increment: Option<f32>,

    /// Depth map filter (none, box, gaussian, median)
    #[arg(long)]
    filter: Option<FilterType>,

    /// Depth map filter kernel size
    #[arg(long)]
    filter_kernel: Option<usize>,
}

impl Overrides {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(measure) = self.measure {
            config.focus.measure = measure;
        }
        if let Some(k) = self.focus_kernel {
            config.focus.kernel_size = k;
        }
        if let Some(k) = self.pre_filter {
            config.focus.pre_filter_kernel_size = k;
        }
        if let Some(d) = self.initial_depth {
            config.depth.initial_depth = d;
        }
        if let Some(d) = self.depth_increment {
            config.depth.depth_increment = d;
        }
        if let Some(filter) = self.filter {
            config.filter.filter_type = filter;
        }
        if let Some(k) = self.filter_kernel {
            config.filter.kernel_size = k;
        }
    }
}

#[derive(Serialize)]
struct EstimateSummary {
    images: usize,
    width: u32,
    height: u32,
    config: PipelineConfig,
    depth_range: Option<(f32, f32)>,
    error: Option<ErrorStatistics>,
    histogram_max_error: Option<f32>,
}

#[derive(Serialize)]
struct ProbeSummary {
    x: usize,
    y: usize,
    scores: Vec<f32>,
}

fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::load_or_default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[allow(clippy::too_many_arguments)]
fn cmd_estimate(
    config_path: Option<&Path>,
    images: &[PathBuf],
    reference: Option<&Path>,
    overrides: &Overrides,
    output: Option<&Path>,
    depth_png: Option<&Path>,
    error_png: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    let mut session = DepthSession::open_paths(images, reference)?;
    session.run(&config)?;

    if let Some(path) = output {
        session.save_depth_map(path)?;
    }
    if let Some(path) = depth_png {
        session.save_normalized_depth(path)?;
    }
    if let Some(path) = error_png {
        if session.error_map().is_some() {
            session.save_normalized_error(path)?;
        } else {
            log::warn!("No reference depth map, skipping {}", path.display());
        }
    }

    let (width, height) = session.stack().dimensions();
    let summary = EstimateSummary {
        images: session.stack().len(),
        width,
        height,
        config,
        depth_range: session.filtered_depth_map().and_then(|m| m.min_max()),
        error: session.error_statistics().copied(),
        histogram_max_error: session.error_histogram().map(|h| h.max_error),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} images, {}x{}", summary.images, width, height);
    if let Some((lo, hi)) = summary.depth_range {
        println!("Depth range: {} .. {}", lo, hi);
    }
    match summary.error {
        Some(stats) => println!(
            "Error: mean {:.4}, median {:.4}, min {:.4}, max {:.4}",
            stats.mean, stats.median, stats.min, stats.max
        ),
        None => println!("Error: no reference"),
    }
    Ok(())
}

fn cmd_probe(
    config_path: Option<&Path>,
    images: &[PathBuf],
    x: usize,
    y: usize,
    overrides: &Overrides,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    let mut session = DepthSession::open_paths(images, None)?;
    session.compute_focus(
        config.focus.measure,
        config.focus.kernel_size,
        config.focus.pre_filter_kernel_size,
    )?;
    let scores = session.focus_scores_at(x, y)?;

    if json {
        println!("{}", serde_json::to_string(&ProbeSummary { x, y, scores })?);
    } else {
        for (i, score) in scores.iter().enumerate() {
            println!("{}\t{}", i, score);
        }
    }
    Ok(())
}

fn cmd_init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(PipelineConfig::default_path);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    PipelineConfig::default().save_to_file(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    depthfocus::init_logging();
    let args = Args::parse();
    let config = args.config.as_deref();

    match args.command {
        Command::Estimate {
            images,
            reference,
            overrides,
            output,
            depth_png,
            error_png,
            json,
        } => cmd_estimate(
            config,
            &images,
            reference.as_deref(),
            &overrides,
            output.as_deref(),
            depth_png.as_deref(),
            error_png.as_deref(),
            json,
        ),
        Command::Probe {
            images,
            x,
            y,
            overrides,
            json,
        } => cmd_probe(config, &images, x, y, &overrides, json),
        Command::InitConfig { path, force } => cmd_init_config(path, force),
    }
}
