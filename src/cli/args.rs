//! CLI argument definitions.

use crate::cli::validators::{parse_opacity, parse_polyhedron_points, parse_rms_path};
use crate::config::{BackgroundColor, EllipsoidMethod, OutputFormat, RmsAlgorithm};
use crate::constants::{DEFAULT_RMS_PATH, invue};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Interactive 3D plots of principal coordinates for KiNG and inVUE.
#[derive(Debug, Parser)]
#[command(name = "kinplot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Plot options.
    #[command(flatten)]
    pub plot: PlotArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for plotting.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Coordinates file, or a directory of jackknifed coordinate files.
    #[arg(short = 'i', long = "coord-fname")]
    pub coord_fname: Option<PathBuf>,

    /// Metadata mapping file.
    #[arg(short = 'm', long = "map-fname")]
    pub map_fname: Option<PathBuf>,

    /// Categories to color by (comma-separated; `A&&B` combines columns; `ALL` for every column).
    #[arg(short = 'b', long)]
    pub colorby: Option<String>,

    /// Numeric mapping columns plotted as leading axes (comma-separated).
    #[arg(short = 'a', long)]
    pub custom_axes: Option<String>,

    /// Preferences file (TOML, or JSON with a `.json` extension).
    #[arg(short = 'p', long, env = "KINPLOT_PREFS_PATH")]
    pub prefs_path: Option<PathBuf>,

    /// Plot background color.
    #[arg(short = 'k', long, value_enum, env = "KINPLOT_BACKGROUND_COLOR")]
    pub background_color: Option<BackgroundColor>,

    /// Ellipsoid subdivision level (0-3).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub ellipsoid_smoothness: Option<u8>,

    /// Ellipsoid opacity (0.0-1.0).
    #[arg(long, value_parser = parse_opacity)]
    pub ellipsoid_opacity: Option<f64>,

    /// Statistic used to size jackknife ellipsoids.
    #[arg(long, value_enum)]
    pub ellipsoid_method: Option<EllipsoidMethod>,

    /// Coordinates file used as the ellipsoid centers.
    #[arg(long)]
    pub master_pcoa: Option<PathBuf>,

    /// Summarized taxa table for biplots.
    #[arg(short = 't', long)]
    pub taxa_fname: Option<PathBuf>,

    /// Number of taxa drawn in biplots (<= 0 keeps all).
    #[arg(long, allow_negative_numbers = true)]
    pub n_taxa_keep: Option<i64>,

    /// Write biplot taxon coordinates to this file.
    #[arg(long)]
    pub biplot_output_file: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, env = "KINPLOT_OUTPUT_FORMAT")]
    pub output_format: Option<OutputFormat>,

    /// Points interpolated between successive samples (invue only).
    #[arg(
        short = 'n',
        long,
        default_value_t = invue::DEFAULT_INTERPOLATION_POINTS,
        allow_negative_numbers = true
    )]
    pub interpolation_points: i64,

    /// Number of polyhedron frame points (invue only).
    #[arg(long, default_value_t = invue::DEFAULT_POLYHEDRON_POINTS, value_parser = parse_polyhedron_points)]
    pub polyhedron_points: usize,

    /// Polyhedron radius as a multiple of the largest sample distance (invue only).
    #[arg(long, default_value_t = invue::DEFAULT_POLYHEDRON_OFFSET)]
    pub polyhedron_offset: f64,

    /// Draw trajectories: `group[,order]` mapping columns.
    #[arg(long)]
    pub add_vectors: Option<String>,

    /// Compute trajectory RMS and ANOVA with this algorithm.
    #[arg(long, value_enum)]
    pub rms_algorithm: Option<RmsAlgorithm>,

    /// RMS output file name.
    #[arg(long, default_value = DEFAULT_RMS_PATH, value_parser = parse_rms_path)]
    pub rms_path: String,

    /// Output directory.
    #[arg(short, long, default_value = ".", env = "KINPLOT_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// KiNG viewer jar copied next to the HTML page (overrides config).
    #[arg(long, env = "KINPLOT_KING_JAR")]
    pub king_jar: Option<PathBuf>,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable progress bars.
    #[arg(long)]
    pub no_progress: bool,
}
