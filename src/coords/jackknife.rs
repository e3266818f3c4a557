//! Summaries of jackknifed principal coordinates.

use super::{Bounds, CoordData, procrustes};
use crate::config::EllipsoidMethod;
use crate::error::{Error, Result};
use crate::parse::Coordinates;
use nalgebra::DMatrix;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Average a set of replicate coordinates and compute confidence bounds.
///
/// Each replicate is reordered to the master's samples, Procrustes-fitted
/// onto the master, and sign-flipped per axis to agree with it. The
/// result's coordinates are the element-wise replicate averages.
pub fn summarize_pcoas(
    master: &Coordinates,
    replicates: &[(PathBuf, Coordinates)],
    method: EllipsoidMethod,
) -> Result<CoordData> {
    let dims = replicates
        .iter()
        .map(|(_, r)| r.dimensions())
        .fold(master.dimensions(), usize::min);
    let master_matrix = master.matrix.columns(0, dims).into_owned();
    let master_index: HashMap<&str, usize> = master
        .sample_ids
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();

    let mut reference = master_matrix.clone();
    let mut aligned = Vec::with_capacity(replicates.len());

    for (path, rep) in replicates {
        let mismatch = |message: String| Error::ReplicateMismatch {
            path: path.clone(),
            message,
        };

        if rep.sample_ids.len() != master.sample_ids.len() {
            return Err(mismatch(format!(
                "{} samples, master has {}",
                rep.sample_ids.len(),
                master.sample_ids.len()
            )));
        }

        // rows in master sample order
        let mut order = vec![0; rep.sample_ids.len()];
        for (rep_row, id) in rep.sample_ids.iter().enumerate() {
            let master_row = master_index
                .get(id.as_str())
                .ok_or_else(|| mismatch(format!("sample '{id}' not in master")))?;
            order[*master_row] = rep_row;
        }
        let matrix = rep.matrix.columns(0, dims).select_rows(order.iter());

        let fit = procrustes(&master_matrix, &matrix)
            .ok_or_else(|| mismatch("coordinates have no spread".to_string()))?;
        debug!("{}: procrustes disparity {:.6}", path.display(), fit.disparity);
        reference = fit.reference;
        aligned.push(fit.fitted);
    }

    let flipped: Vec<DMatrix<f64>> = aligned
        .iter()
        .map(|m| flip_vectors(m, &reference))
        .collect();

    let (coords, low, high) = average_and_bounds(&flipped, method);

    let mut eigvals = vec![0.0; dims];
    for (_, rep) in replicates {
        for (acc, value) in eigvals.iter_mut().zip(&rep.eigvals) {
            *acc += value;
        }
    }
    let count = replicates.len().max(1) as f64;
    for value in &mut eigvals {
        *value /= count;
    }

    Ok(CoordData {
        sample_ids: master.sample_ids.clone(),
        coords,
        eigvals,
        pct_var: master.pct_var.iter().take(dims).copied().collect(),
        bounds: Some(Bounds { low, high }),
        custom_axes: Vec::new(),
    })
}

/// Flip replicate axes whose sign disagrees with the master.
///
/// An axis is negated when that lowers its L1 distance to the master axis.
pub fn flip_vectors(replicate: &DMatrix<f64>, master: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = replicate.clone();
    for (j, mut column) in out.column_iter_mut().enumerate() {
        let m = master.column(j);
        let same: f64 = m.iter().zip(column.iter()).map(|(a, b)| (a - b).abs()).sum();
        let flipped: f64 = m.iter().zip(column.iter()).map(|(a, b)| (a + b).abs()).sum();
        if same > flipped {
            column.neg_mut();
        }
    }
    out
}

fn average_and_bounds(
    matrices: &[DMatrix<f64>],
    method: EllipsoidMethod,
) -> (DMatrix<f64>, DMatrix<f64>, DMatrix<f64>) {
    let (rows, cols) = matrices[0].shape();
    let mut average = DMatrix::zeros(rows, cols);
    let mut low = DMatrix::zeros(rows, cols);
    let mut high = DMatrix::zeros(rows, cols);

    for r in 0..rows {
        for c in 0..cols {
            let values: Vec<f64> = matrices.iter().map(|m| m[(r, c)]).collect();
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            average[(r, c)] = mean;

            let (lo, hi) = match method {
                EllipsoidMethod::Iqr => interquartile_bounds(&values),
                EllipsoidMethod::Sdev => {
                    let sd = sample_std(&values, mean);
                    (-sd / 2.0, sd / 2.0)
                }
            };
            low[(r, c)] = lo;
            high[(r, c)] = hi;
        }
    }

    (average, low, high)
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        f64::midpoint(sorted[n / 2 - 1], sorted[n / 2])
    }
}

/// Lower and upper quartiles as medians of the lower and upper halves.
///
/// With an odd count the middle value belongs to neither half.
pub fn interquartile_bounds(values: &[f64]) -> (f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    if sorted.len() < 2 {
        let v = sorted.first().copied().unwrap_or(f64::NAN);
        return (v, v);
    }

    let mid = sorted.len() / 2;
    let (lower, upper) = if sorted.len() % 2 == 1 {
        (&sorted[..mid], &sorted[mid + 1..])
    } else {
        (&sorted[..mid], &sorted[mid..])
    };
    (median(lower), median(upper))
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn coords(ids: &[&str], values: &[f64]) -> Coordinates {
        let rows = ids.len();
        Coordinates {
            sample_ids: ids.iter().map(ToString::to_string).collect(),
            matrix: DMatrix::from_row_slice(rows, values.len() / rows, values),
            eigvals: vec![2.0, 1.0, 0.5],
            pct_var: vec![50.0, 25.0, 12.5],
        }
    }

    const BASE: [f64; 12] = [
        1.0, 0.2, 0.1, //
        -0.5, 0.9, -0.3, //
        -0.4, -0.7, 0.4, //
        0.1, -0.3, -0.6,
    ];

    #[test]
    fn test_interquartile_bounds_even() {
        assert_eq!(interquartile_bounds(&[4.0, 1.0, 3.0, 2.0]), (1.5, 3.5));
    }

    #[test]
    fn test_interquartile_bounds_odd_excludes_middle() {
        assert_eq!(interquartile_bounds(&[5.0, 1.0, 3.0, 2.0, 4.0]), (1.5, 4.5));
    }

    #[test]
    fn test_interquartile_bounds_single() {
        assert_eq!(interquartile_bounds(&[7.0]), (7.0, 7.0));
    }

    #[test]
    fn test_flip_vectors() {
        let master = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, -1.0, 2.0]);
        let rep = DMatrix::from_row_slice(2, 2, &[-1.0, 1.0, 1.0, 2.0]);
        let flipped = flip_vectors(&rep, &master);
        assert_eq!(flipped, master);
    }

    #[test]
    fn test_summarize_identical_replicates() {
        let master = coords(&["A", "B", "C", "D"], &BASE);
        let reps = vec![
            (PathBuf::from("r1"), master.clone()),
            (PathBuf::from("r2"), master.clone()),
        ];

        let summary = summarize_pcoas(&master, &reps, EllipsoidMethod::Sdev).unwrap();
        let bounds = summary.bounds.unwrap();
        assert!(bounds.high.amax() < 1e-9);
        assert_eq!(summary.pct_var, vec![50.0, 25.0, 12.5]);
        assert_eq!(summary.eigvals, vec![2.0, 1.0, 0.5]);
        // standardized coordinates have unit norm
        assert!((summary.coords.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_reorders_replicate_rows() {
        let master = coords(&["A", "B", "C", "D"], &BASE);
        let mut shuffled = BASE;
        shuffled[..3].copy_from_slice(&BASE[3..6]);
        shuffled[3..6].copy_from_slice(&BASE[..3]);
        let rep = coords(&["B", "A", "C", "D"], &shuffled);

        let reps = vec![(PathBuf::from("r1"), rep)];
        let summary = summarize_pcoas(&master, &reps, EllipsoidMethod::Iqr).unwrap();
        let fit = procrustes(&master.matrix, &master.matrix).unwrap();
        assert!((&summary.coords - &fit.reference).amax() < 1e-9);
    }

    #[test]
    fn test_summarize_sample_mismatch() {
        let master = coords(&["A", "B", "C", "D"], &BASE);
        let rep = coords(&["A", "B", "C", "X"], &BASE);
        let reps = vec![(PathBuf::from("r1"), rep)];
        assert!(matches!(
            summarize_pcoas(&master, &reps, EllipsoidMethod::Iqr),
            Err(Error::ReplicateMismatch { .. })
        ));
    }
}
