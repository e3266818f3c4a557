//! Coordinate data preparation.
//!
//! Loads a single coordinates file or summarizes a directory of jackknifed
//! replicates, then filters and extends the matrix before plotting.

mod custom_axes;
mod jackknife;
mod procrustes;

pub use custom_axes::{apply_custom_axes, process_custom_axes};
pub use jackknife::{flip_vectors, interquartile_bounds, summarize_pcoas};
pub use procrustes::{ProcrustesFit, procrustes};

use crate::config::EllipsoidMethod;
use crate::error::{Error, Result};
use crate::output::progress;
use crate::parse::{Coordinates, MappingTable, coord_file_paths, parse_coords};
use nalgebra::DMatrix;
use std::path::Path;
use tracing::{debug, info};

/// Low and high confidence bounds for each coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    /// Lower bound, same shape as the coordinates.
    pub low: DMatrix<f64>,
    /// Upper bound, same shape as the coordinates.
    pub high: DMatrix<f64>,
}

/// Coordinates ready for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordData {
    /// Sample ids, one per matrix row.
    pub sample_ids: Vec<String>,
    /// Sample-by-axis coordinates. Custom axes, when present, come first.
    pub coords: DMatrix<f64>,
    /// Eigenvalues of the principal axes.
    pub eigvals: Vec<f64>,
    /// Percent variation explained by the principal axes.
    pub pct_var: Vec<f64>,
    /// Jackknife confidence bounds.
    pub bounds: Option<Bounds>,
    /// Names of the leading metadata axes.
    pub custom_axes: Vec<String>,
}

impl From<Coordinates> for CoordData {
    fn from(c: Coordinates) -> Self {
        Self {
            sample_ids: c.sample_ids,
            coords: c.matrix,
            eigvals: c.eigvals,
            pct_var: c.pct_var,
            bounds: None,
            custom_axes: Vec::new(),
        }
    }
}

impl CoordData {
    /// Number of plotted axes.
    pub fn dimensions(&self) -> usize {
        self.coords.ncols()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.sample_ids.len()
    }

    /// Whether no samples remain.
    pub fn is_empty(&self) -> bool {
        self.sample_ids.is_empty()
    }

    /// Percent variation for every plotted axis. Custom axes take the
    /// first principal axis' value.
    pub fn axis_pct(&self) -> Vec<f64> {
        let n_custom = self.custom_axes.len();
        let first = self.pct_var.first().copied().unwrap_or(0.0);
        (0..self.dimensions())
            .map(|c| {
                if c < n_custom {
                    first
                } else {
                    self.pct_var.get(c - n_custom).copied().unwrap_or(0.0)
                }
            })
            .collect()
    }

    /// Axis labels: custom axis names, then `PCk (pct%)`.
    pub fn axis_labels(&self) -> Vec<String> {
        let n_custom = self.custom_axes.len();
        (0..self.dimensions())
            .map(|c| {
                if c < n_custom {
                    self.custom_axes[c].clone()
                } else {
                    let k = c - n_custom;
                    match self.pct_var.get(k) {
                        Some(pct) => format!("PC{} ({pct:.0}%)", k + 1),
                        None => format!("PC{}", k + 1),
                    }
                }
            })
            .collect()
    }

    /// Row index of a sample.
    pub fn index_of(&self, sample_id: &str) -> Option<usize> {
        self.sample_ids.iter().position(|s| s == sample_id)
    }

    /// Coordinates of one sample.
    pub fn row(&self, idx: usize) -> Vec<f64> {
        self.coords.row(idx).iter().copied().collect()
    }

    /// Keep only rows whose index passes the predicate. Returns the number removed.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(usize) -> bool) -> usize {
        let kept: Vec<usize> = (0..self.len()).filter(|&i| keep(i)).collect();
        let removed = self.len() - kept.len();
        if removed == 0 {
            return 0;
        }

        self.sample_ids = kept.iter().map(|&i| self.sample_ids[i].clone()).collect();
        self.coords = self.coords.select_rows(kept.iter());
        if let Some(bounds) = &mut self.bounds {
            bounds.low = bounds.low.select_rows(kept.iter());
            bounds.high = bounds.high.select_rows(kept.iter());
        }
        removed
    }

    /// Drop samples that are not in the mapping file.
    pub fn remove_unmapped_samples(&mut self, mapping: &MappingTable) -> Result<()> {
        let ids = self.sample_ids.clone();
        let removed = self.retain_rows(|i| mapping.contains_sample(&ids[i]));
        if removed > 0 {
            info!("Removed {removed} sample(s) missing from the mapping file");
        }
        if self.is_empty() {
            return Err(Error::NoSamplesInCommon);
        }
        Ok(())
    }

    /// Drop samples with any NaN coordinate. Returns the number removed.
    pub fn remove_nans(&mut self) -> usize {
        let coords = self.coords.clone();
        self.retain_rows(|i| coords.row(i).iter().all(|v| !v.is_nan()))
    }

    /// Insert columns in front of the coordinates (and zero-width bounds).
    pub fn prepend_columns(&mut self, columns: &DMatrix<f64>) {
        let extra = columns.ncols();
        let rows = self.len();
        let old = &self.coords;
        self.coords = DMatrix::from_fn(rows, extra + old.ncols(), |r, c| {
            if c < extra {
                columns[(r, c)]
            } else {
                old[(r, c - extra)]
            }
        });

        if let Some(bounds) = &mut self.bounds {
            let widen = |m: &DMatrix<f64>| {
                DMatrix::from_fn(rows, extra + m.ncols(), |r, c| {
                    if c < extra { 0.0 } else { m[(r, c - extra)] }
                })
            };
            bounds.low = widen(&bounds.low);
            bounds.high = widen(&bounds.high);
        }
    }
}

/// Load coordinates from a file, or summarize a directory of replicates.
///
/// For a directory the master is `master` when given, otherwise the first
/// file in name order.
pub fn get_coord(
    path: &Path,
    method: EllipsoidMethod,
    master: Option<&Path>,
    progress_enabled: bool,
) -> Result<CoordData> {
    if !path.is_dir() {
        return Ok(parse_coords(path)?.into());
    }

    let files = coord_file_paths(path)?;
    let pb = progress::create_replicate_progress(files.len(), progress_enabled);

    let mut replicates = Vec::with_capacity(files.len());
    for file in &files {
        debug!("Reading replicate {}", file.display());
        replicates.push((file.clone(), parse_coords(file)?));
        progress::inc_progress(pb.as_ref());
    }
    progress::finish_progress(pb, "Loaded");

    let master_coords = match master {
        Some(m) => parse_coords(m)?,
        None => replicates[0].1.clone(),
    };

    info!(
        "Summarizing {} jackknife replicates ({} method)",
        replicates.len(),
        method
    );
    summarize_pcoas(&master_coords, &replicates, method)
}
