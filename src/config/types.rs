//! Configuration type definitions.

use crate::constants::{DEFAULT_N_TAXA_KEEP, DEFAULT_NUM_COORDS, ellipsoid};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default plot settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Static assets copied next to the plots.
    #[serde(default)]
    pub support: SupportConfig,
}

/// Default plot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Background color used when neither the CLI nor prefs set one.
    pub background_color: Option<BackgroundColor>,

    /// Statistic used for jackknife confidence ellipsoids.
    pub ellipsoid_method: EllipsoidMethod,

    /// Ellipsoid subdivision level (0-3).
    pub ellipsoid_smoothness: u8,

    /// Ellipsoid opacity (0.0-1.0).
    pub ellipsoid_opacity: f64,

    /// Number of taxa drawn in biplots (<= 0 keeps all).
    pub n_taxa_keep: i64,

    /// Output format.
    pub output_format: OutputFormat,

    /// Maximum number of axes written into each kinemage.
    pub num_coords: usize,

    /// Emit kinemages scaled by percent variation explained.
    pub scaled: bool,

    /// Emit kinemages with raw coordinates.
    pub unscaled: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            ellipsoid_method: EllipsoidMethod::default(),
            ellipsoid_smoothness: ellipsoid::DEFAULT_SMOOTHNESS,
            ellipsoid_opacity: ellipsoid::DEFAULT_OPACITY,
            n_taxa_keep: DEFAULT_N_TAXA_KEEP,
            output_format: OutputFormat::default(),
            num_coords: DEFAULT_NUM_COORDS,
            scaled: true,
            unscaled: true,
        }
    }
}

/// Static asset locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    /// Path to the KiNG viewer jar copied into `<output>/jar/`.
    pub king_jar: Option<PathBuf>,
}

/// Plot background.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundColor {
    /// Black background, white axes.
    #[default]
    Black,
    /// White background, black axes.
    White,
}

impl std::fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Black => write!(f, "black"),
            Self::White => write!(f, "white"),
        }
    }
}

impl std::str::FromStr for BackgroundColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "black" => Ok(Self::Black),
            "white" => Ok(Self::White),
            other => Err(format!("unknown background color: {other}")),
        }
    }
}

/// Statistic used to size jackknife ellipsoids.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum EllipsoidMethod {
    /// Interquartile range of the replicate values.
    #[default]
    #[serde(rename = "IQR")]
    #[value(name = "IQR")]
    Iqr,
    /// Sample standard deviation of the replicate values.
    #[serde(rename = "sdev")]
    #[value(name = "sdev")]
    Sdev,
}

impl std::fmt::Display for EllipsoidMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iqr => write!(f, "IQR"),
            Self::Sdev => write!(f, "sdev"),
        }
    }
}

/// Supported output formats.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Kinemage file plus HTML page for the KiNG viewer.
    #[default]
    King,
    /// Tab-separated point files for inVUE.
    Invue,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::King => write!(f, "king"),
            Self::Invue => write!(f, "invue"),
        }
    }
}

/// Trajectory RMS algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RmsAlgorithm {
    /// Norm of each per-timepoint group average.
    Avg,
    /// Norm of each step between successive points.
    Trajectory,
}

impl std::fmt::Display for RmsAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Avg => write!(f, "avg"),
            Self::Trajectory => write!(f, "trajectory"),
        }
    }
}
