//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "kinplot";

/// Maximum number of axes written into a kinemage.
pub const DEFAULT_NUM_COORDS: usize = 10;

/// Minimum number of axes a coordinate matrix needs for a 3D plot.
pub const MIN_PLOT_DIMENSIONS: usize = 3;

/// Default number of taxa kept for biplots.
pub const DEFAULT_N_TAXA_KEEP: i64 = 10;

/// Default RMS output file name.
pub const DEFAULT_RMS_PATH: &str = "RMS_output.txt";

/// Prefix every RMS output file name starts with.
pub const RMS_PREFIX: &str = "RMS";

/// Characters allowed in the RMS output file name.
pub const RMS_PATH_VALID_CHARS: &str =
    "_.abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Maximum number of columns accepted by `--add-vectors`.
pub const MAX_VECTOR_COLUMNS: usize = 2;

/// Ellipsoid drawing bounds and defaults.
pub mod ellipsoid {
    /// Default subdivision level.
    pub const DEFAULT_SMOOTHNESS: u8 = 1;
    /// Highest accepted subdivision level.
    pub const MAX_SMOOTHNESS: u8 = 3;
    /// Default ellipsoid opacity.
    pub const DEFAULT_OPACITY: f64 = 0.33;
}

/// Kinemage layout constants.
pub mod kinemage {
    /// Ball radius as a fraction of the first axis range.
    pub const RADIUS_RATIO: f64 = 0.01;
    /// Alpha used for sample balls and labels.
    pub const POINT_ALPHA: f64 = 0.75;
    /// Axis vectors after this index start switched off.
    pub const VISIBLE_AXES: usize = 3;
    /// Axis labels sit this far past the axis end.
    pub const AXIS_LABEL_OFFSET: f64 = 1.1;
    /// Smallest taxon ball, relative to the sample radius.
    pub const MIN_TAXON_RADIUS: f64 = 0.5;
    /// Largest taxon ball, relative to the sample radius.
    pub const MAX_TAXON_RADIUS: f64 = 5.0;
    /// Alpha used for taxon markers.
    pub const TAXON_ALPHA: f64 = 0.5;
    /// File extension of kinemage output.
    pub const EXTENSION: &str = "kin";
    /// Suffix of the HTML page that embeds the viewer.
    pub const HTML_SUFFIX: &str = "_3D.html";
    /// Directory (under the output directory) holding the viewer jar.
    pub const JAR_DIR: &str = "jar";
    /// Viewer jar file name.
    pub const JAR_NAME: &str = "king.jar";
}

/// inVUE layout constants.
pub mod invue {
    /// Default number of interpolated points between samples.
    pub const DEFAULT_INTERPOLATION_POINTS: i64 = 0;
    /// Default number of polyhedron frame points.
    pub const DEFAULT_POLYHEDRON_POINTS: usize = 4;
    /// Minimum number of polyhedron frame points.
    pub const MIN_POLYHEDRON_POINTS: usize = 4;
    /// Default polyhedron offset.
    pub const DEFAULT_POLYHEDRON_OFFSET: f64 = 1.5;
    /// Suffix of the file listing every sample.
    pub const ALL_SAMPLES: &str = "All_samples";
    /// Suffix of the polyhedron frame file.
    pub const POLYHEDRON: &str = "polyhedron";
}

/// Preference defaults.
pub mod prefs {
    /// Default label color.
    pub const LABEL_COLOR: &str = "white";
    /// Default ball scale.
    pub const BALL_SCALE: f64 = 1.0;
    /// Default trajectory line color.
    pub const ARROW_LINE_COLOR: &str = "white";
    /// Default trajectory end color.
    pub const ARROW_HEAD_COLOR: &str = "red1";
}

/// Keyword that selects every mapping column for coloring.
pub const COLORBY_ALL: &str = "ALL";

/// Separator that combines mapping columns into one category.
pub const COMBINE_SEPARATOR: &str = "&&";
