//! Plot option validation and output layout.

use crate::config::{BackgroundColor, EllipsoidMethod, OutputFormat, RmsAlgorithm};
use crate::config::{validate_ellipsoid_opacity, validate_ellipsoid_smoothness};
use crate::constants::kinemage::{JAR_DIR, JAR_NAME};
use crate::constants::{MAX_VECTOR_COLUMNS, RMS_PATH_VALID_CHARS};
use crate::error::{Error, Result};
use crate::output::create_output_dir;
use crate::parse::{coord_file_paths, validate_coord_files};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Fully resolved options for one plotting run.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct PlotOptions {
    /// Coordinates file or directory of jackknifed replicates.
    pub coord_path: PathBuf,
    /// Metadata mapping file.
    pub map_path: PathBuf,
    /// Categories to color by.
    pub colorby: Option<String>,
    /// Mapping columns plotted as leading axes.
    pub custom_axes: Vec<String>,
    /// Preferences file.
    pub prefs_path: Option<PathBuf>,
    /// Background set on the command line.
    pub background: Option<BackgroundColor>,
    /// Background from the config file, used when neither CLI nor prefs set one.
    pub config_background: Option<BackgroundColor>,
    /// Statistic used for jackknife ellipsoids.
    pub ellipsoid_method: EllipsoidMethod,
    /// Ellipsoid subdivision level.
    pub ellipsoid_smoothness: u8,
    /// Ellipsoid opacity.
    pub ellipsoid_opacity: f64,
    /// Ellipsoid centers for jackknifed input.
    pub master_pcoa: Option<PathBuf>,
    /// Taxa summary for biplots.
    pub taxa_path: Option<PathBuf>,
    /// Number of taxa kept (<= 0 keeps all).
    pub n_taxa_keep: i64,
    /// Where to write biplot taxon coordinates.
    pub biplot_output: Option<PathBuf>,
    /// Output format.
    pub output_format: OutputFormat,
    /// Points interpolated between successive samples.
    pub interpolation_points: i64,
    /// Number of polyhedron frame points.
    pub polyhedron_points: usize,
    /// Polyhedron radius multiplier.
    pub polyhedron_offset: f64,
    /// Trajectory columns, `group[,order]`.
    pub add_vectors: Option<String>,
    /// RMS algorithm for trajectories.
    pub rms_algorithm: Option<RmsAlgorithm>,
    /// RMS output file name.
    pub rms_path: String,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Viewer jar copied into `<output>/jar/`.
    pub king_jar: Option<PathBuf>,
    /// Maximum number of axes in each kinemage.
    pub num_coords: usize,
    /// Emit kinemages scaled by percent variation.
    pub scaled: bool,
    /// Emit kinemages with raw coordinates.
    pub unscaled: bool,
    /// Whether to show progress bars.
    pub progress_enabled: bool,
}

/// Check option combinations before anything is read or written.
pub fn validate_options(options: &PlotOptions) -> Result<()> {
    validate_ellipsoid_smoothness(options.ellipsoid_smoothness).map_err(Error::invalid_option)?;
    validate_ellipsoid_opacity(options.ellipsoid_opacity).map_err(Error::invalid_option)?;

    match options.output_format {
        OutputFormat::Invue => {
            if options.interpolation_points < 0 {
                return Err(Error::invalid_option(format!(
                    "interpolation points must be 0 or more, got {}",
                    options.interpolation_points
                )));
            }
            if options.colorby.is_none() && options.prefs_path.is_none() {
                return Err(Error::invalid_option(
                    "invue output requires --colorby or --prefs-path",
                ));
            }
        }
        OutputFormat::King => {
            if !options.custom_axes.is_empty() && options.coord_path.is_dir() {
                return Err(Error::invalid_option(
                    "custom axes cannot be used with a directory of jackknifed coordinates",
                ));
            }
        }
    }

    if !options.coord_path.exists() {
        return Err(Error::invalid_option(format!(
            "coordinates path does not exist: {}",
            options.coord_path.display()
        )));
    }
    if !options.map_path.is_file() {
        return Err(Error::invalid_option(format!(
            "mapping file does not exist: {}",
            options.map_path.display()
        )));
    }
    validate_coord_files(&options.coord_path)?;

    if let Some(spec) = &options.add_vectors {
        let n = spec.split(',').filter(|c| !c.trim().is_empty()).count();
        if n == 0 || n > MAX_VECTOR_COLUMNS {
            return Err(Error::invalid_option(format!(
                "--add-vectors takes 1 or {MAX_VECTOR_COLUMNS} columns, got '{spec}'"
            )));
        }
    }

    if options.rms_algorithm.is_some() && options.add_vectors.is_none() {
        return Err(Error::invalid_option(
            "--rms-algorithm requires --add-vectors",
        ));
    }
    if options.rms_path.is_empty()
        || options
            .rms_path
            .chars()
            .any(|c| !RMS_PATH_VALID_CHARS.contains(c))
    {
        return Err(Error::invalid_option(format!(
            "invalid RMS output file name: '{}'",
            options.rms_path
        )));
    }

    Ok(())
}

/// Name used for output files: the coordinates file name, or the first
/// coordinate file of a directory.
pub fn plot_name(coord_path: &Path) -> Result<String> {
    let first = coord_file_paths(coord_path)?
        .into_iter()
        .next()
        .unwrap_or_else(|| coord_path.to_path_buf());
    Ok(first
        .file_name()
        .map_or_else(|| "coords".to_string(), |n| n.to_string_lossy().into_owned()))
}

/// Create `<output>/<name>_<timestamp>` for the kinemage file.
pub fn create_data_dir(output_dir: &Path, name: &str) -> Result<PathBuf> {
    let stamp = Utc::now().format("%Y%m%d%H%M%S%f");
    let dir = output_dir.join(format!("{name}_{stamp}"));
    create_output_dir(&dir)?;
    debug!("Created data directory {}", dir.display());
    Ok(dir)
}

/// Copy the viewer jar into `<output>/jar/`.
///
/// A missing jar is not an error; the HTML page is still written.
pub fn copy_king_jar(jar: Option<&Path>, output_dir: &Path) -> Result<Option<PathBuf>> {
    let Some(jar) = jar else {
        warn!(
            "No KiNG jar configured; place king.jar in {} to view the plot",
            output_dir.join(JAR_DIR).display()
        );
        return Ok(None);
    };

    if !jar.is_file() {
        warn!("KiNG jar not found: {}", jar.display());
        return Ok(None);
    }

    let jar_dir = output_dir.join(JAR_DIR);
    create_output_dir(&jar_dir)?;
    let dest = jar_dir.join(JAR_NAME);
    std::fs::copy(jar, &dest).map_err(|e| Error::JarCopy {
        path: jar.to_path_buf(),
        source: e,
    })?;
    info!("Copied KiNG jar to {}", dest.display());
    Ok(Some(dest))
}
