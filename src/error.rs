//! Error types for kinplot.

use std::path::PathBuf;

/// Result type alias for kinplot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for kinplot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// A command-line option has an invalid value or combination.
    #[error("{message}")]
    InvalidOption {
        /// Description of the problem.
        message: String,
    },

    /// Failed to read an input table.
    #[error("failed to read '{path}'")]
    InputRead {
        /// Path to the input file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed coordinates file.
    #[error("invalid coordinates file '{path}' (line {line}): {message}")]
    CoordsFormat {
        /// Path to the coordinates file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Description of the format error.
        message: String,
    },

    /// Lines of a coordinates file disagree on their column count.
    #[error("every line of every coord file must have the same number of columns ('{path}')")]
    InconsistentColumns {
        /// Offending file.
        path: PathBuf,
    },

    /// A coordinates directory holds no usable files.
    #[error("no coordinate files found in '{path}'")]
    NoCoordFiles {
        /// Directory that was searched.
        path: PathBuf,
    },

    /// A jackknife replicate does not line up with the master coordinates.
    #[error("replicate '{path}' does not match the master coordinates: {message}")]
    ReplicateMismatch {
        /// Path to the replicate file.
        path: PathBuf,
        /// Description of the mismatch.
        message: String,
    },

    /// Malformed mapping file.
    #[error("invalid mapping file '{path}' (line {line}): {message}")]
    MappingFormat {
        /// Path to the mapping file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Description of the format error.
        message: String,
    },

    /// Malformed taxa summary file.
    #[error("invalid taxa file '{path}' (line {line}): {message}")]
    TaxaFormat {
        /// Path to the taxa file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Description of the format error.
        message: String,
    },

    /// A plotted sample has no column in the taxa summary.
    #[error("sample '{sample}' not found in taxa file")]
    TaxaSampleMissing {
        /// The missing sample id.
        sample: String,
    },

    /// Failed to parse a preferences file.
    #[error("failed to parse preferences file '{path}': {message}")]
    PrefsParse {
        /// Path to the preferences file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A referenced mapping column does not exist.
    #[error("column '{column}' does not exist in mapping file")]
    UnknownColumn {
        /// The requested column name.
        column: String,
    },

    /// A referenced color is not in the palette.
    #[error("unknown color '{name}'")]
    UnknownColor {
        /// The requested color name.
        name: String,
    },

    /// Coordinates and mapping share no samples.
    #[error("coordinates and mapping file had no samples in common")]
    NoSamplesInCommon,

    /// The coordinate matrix cannot be plotted in 3D.
    #[error("at least {required} dimensions are required for a 3D plot, found {found}")]
    TooFewDimensions {
        /// Dimensions required.
        required: usize,
        /// Dimensions available.
        found: usize,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write output file '{path}'")]
    OutputWrite {
        /// Path to the output file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy the viewer jar.
    #[error("failed to copy viewer jar from '{path}'")]
    JarCopy {
        /// Source jar path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidOption`].
    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOption {
            message: message.into(),
        }
    }
}
