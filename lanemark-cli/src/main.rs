//! lanemark CLI entry point.
//!
//! Detects left/right lane-marking segments in a road image and prints them.
#![allow(clippy::uninlined_format_args)]

use clap::{Args, Parser, Subcommand, ValueEnum};
use lanemark_algorithms::{classify_lanes, LaneClusters};
use lanemark_core::LaneConfig;
use lanemark_io::{detect_lanes_from_path, read_segments, LaneWriter};
use log::debug;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    LanemarkIo(#[from] lanemark_io::Error),

    #[error("{0}")]
    Core(#[from] lanemark_core::Error),

    #[error("parameter file {path}: {source}")]
    Params {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format for lane listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `left lines:` / `right lines:` listing
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Lane-boundary segment detection for road images.
#[derive(Parser)]
#[command(name = "lanemark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect lane segments in an image
    Detect {
        /// Input image (PNG, JPEG or BMP)
        input: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Classify segments read from a JSON file of [x1, y1, x2, y2] arrays
    Classify {
        /// Input segment file
        input: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Print the default parameter block as JSON
    Params,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON parameter block; missing fields take their defaults
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Override the expected number of segments per lane
    #[arg(long)]
    n_lines: Option<usize>,

    /// Override the cluster threshold ratio, in (0, 1]
    #[arg(long)]
    ratio: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl RunArgs {
    /// Builds and validates the run configuration.
    fn config(&self) -> Result<LaneConfig> {
        let mut config = match &self.params {
            Some(path) => load_params(path)?,
            None => LaneConfig::default(),
        };
        if let Some(n_lines) = self.n_lines {
            config.n_lines = n_lines;
        }
        if let Some(ratio) = self.ratio {
            config.cluster_thresh_ratio = ratio;
        }
        Ok(config.validated()?)
    }
}

fn load_params(path: &Path) -> Result<LaneConfig> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Params {
        path: path.to_path_buf(),
        source,
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn print_lanes(lanes: &LaneClusters, format: OutputFormat) -> Result<()> {
    let mut writer = LaneWriter::new(io::stdout().lock());
    match format {
        OutputFormat::Text => writer.write_text(lanes)?,
        OutputFormat::Json => writer.write_json(lanes)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { input, run } => {
            init_logging(run.verbose);
            let config = run.config()?;
            debug!("config: {:?}", config);
            debug!("reading: {}", input.display());

            let lanes = detect_lanes_from_path(&config, &input)?;
            print_lanes(&lanes, run.format)?;
        }

        Commands::Classify { input, run } => {
            init_logging(run.verbose);
            let config = run.config()?;
            let segments = read_segments(&input)?;
            debug!("{} segment(s) from {}", segments.len(), input.display());

            let lanes = classify_lanes(&config, &segments);
            print_lanes(&lanes, run.format)?;
        }

        Commands::Params => {
            let json = serde_json::to_string_pretty(&LaneConfig::default())?;
            println!("{}", json);
        }
    }

    Ok(())
}
