//! Root-mean-square trajectory lengths.

use super::Trajectory;
use super::anova::{AnovaResult, one_way_anova};
use crate::config::RmsAlgorithm;
use crate::constants::RMS_PREFIX;
use crate::coords::CoordData;
use crate::error::Result;
use crate::output::write_output_file;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// RMS of one trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct RmsResult {
    /// Trajectory name.
    pub group: String,
    /// Per-point norms the RMS is taken over.
    pub norms: Vec<f64>,
    /// `sqrt(mean(norm^2))`, NaN without norms.
    pub rms: f64,
}

/// Weighted coordinates of a trajectory's samples.
///
/// Each axis is multiplied by its fraction of variance explained.
fn weighted_points(data: &CoordData, trajectory: &Trajectory) -> Vec<(String, Vec<f64>)> {
    let weights: Vec<f64> = data.axis_pct().iter().map(|p| p / 100.0).collect();
    trajectory
        .sample_ids
        .iter()
        .zip(&trajectory.order_values)
        .filter_map(|(id, order)| {
            let idx = data.index_of(id)?;
            let point = data
                .coords
                .row(idx)
                .iter()
                .zip(&weights)
                .map(|(v, w)| v * w)
                .collect();
            Some((order.clone(), point))
        })
        .collect()
}

fn norm(point: &[f64]) -> f64 {
    point.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Average consecutive points that share an order value.
fn average_by_order(points: Vec<(String, Vec<f64>)>) -> Vec<Vec<f64>> {
    let mut averaged: Vec<(String, Vec<f64>, usize)> = Vec::new();
    for (order, point) in points {
        match averaged.last_mut() {
            Some((last, sum, count)) if *last == order => {
                for (acc, v) in sum.iter_mut().zip(&point) {
                    *acc += v;
                }
                *count += 1;
            }
            _ => averaged.push((order, point, 1)),
        }
    }
    averaged
        .into_iter()
        .map(|(_, sum, count)| sum.into_iter().map(|v| v / count as f64).collect())
        .collect()
}

/// RMS of one trajectory under the chosen algorithm.
///
/// `avg` takes the norm of each per-order average point; `trajectory`
/// takes the norm of each step between successive points.
pub fn compute_rms(
    data: &CoordData,
    trajectory: &Trajectory,
    algorithm: RmsAlgorithm,
) -> RmsResult {
    let points = weighted_points(data, trajectory);

    let norms: Vec<f64> = match algorithm {
        RmsAlgorithm::Avg => average_by_order(points).iter().map(|p| norm(p)).collect(),
        RmsAlgorithm::Trajectory => points
            .windows(2)
            .map(|pair| {
                let (from, to) = (&pair[0].1, &pair[1].1);
                let step: Vec<f64> = to.iter().zip(from).map(|(b, a)| b - a).collect();
                norm(&step)
            })
            .collect(),
    };

    let rms = if norms.is_empty() {
        f64::NAN
    } else {
        (norms.iter().map(|n| n * n).sum::<f64>() / norms.len() as f64).sqrt()
    };

    RmsResult {
        group: trajectory.name.clone(),
        norms,
        rms,
    }
}

/// RMS output path under the output directory, prefixed with `RMS_` unless
/// the name already starts with `RMS`.
pub fn rms_output_path(output_dir: &Path, rms_path: &str) -> PathBuf {
    if rms_path.starts_with(RMS_PREFIX) {
        output_dir.join(rms_path)
    } else {
        output_dir.join(format!("{RMS_PREFIX}_{rms_path}"))
    }
}

/// Write per-group RMS values and the ANOVA across groups.
pub fn write_rms_file(
    path: &Path,
    grouped_by: &str,
    algorithm: RmsAlgorithm,
    results: &[RmsResult],
    anova: &AnovaResult,
) -> Result<()> {
    write_output_file(path, |writer| {
        writeln!(writer, "Grouped by {grouped_by}: {algorithm}")?;
        writeln!(writer)?;
        writeln!(writer, "Group\tRMS\tValues")?;
        for result in results {
            let values: Vec<String> = result.norms.iter().map(ToString::to_string).collect();
            writeln!(writer, "{}\t{}\t{}", result.group, result.rms, values.join(","))?;
        }
        writeln!(writer)?;
        writeln!(writer, "ANOVA F-statistic\t{}", anova.f_statistic)?;
        writeln!(writer, "ANOVA p-value\t{}", anova.p_value)
    })
}

/// Compute RMS for every trajectory, run the ANOVA, and write the file.
pub fn run_rms(
    data: &CoordData,
    trajectories: &[Trajectory],
    grouped_by: &str,
    algorithm: RmsAlgorithm,
    path: &Path,
) -> Result<(Vec<RmsResult>, AnovaResult)> {
    let results: Vec<RmsResult> = trajectories
        .iter()
        .map(|t| compute_rms(data, t, algorithm))
        .collect();
    let norms: Vec<Vec<f64>> = results.iter().map(|r| r.norms.clone()).collect();
    let anova = one_way_anova(&norms);

    write_rms_file(path, grouped_by, algorithm, &results, &anova)?;
    info!(
        "RMS ({algorithm}) over {} groups: F = {:.4}, p = {:.4}; written to {}",
        results.len(),
        anova.f_statistic,
        anova.p_value,
        path.display()
    );
    Ok((results, anova))
}
