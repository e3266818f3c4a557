//! Metadata columns used as plot axes.

use super::CoordData;
use crate::error::Result;
use crate::parse::MappingTable;
use nalgebra::DMatrix;
use tracing::{info, warn};

/// Split a comma-separated axis list, trimming whitespace and quotes.
pub fn process_custom_axes(spec: &str) -> Vec<String> {
    spec.split(',')
        .map(|name| name.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Prepend metadata columns as axes.
///
/// Non-numeric values become NaN and their samples are dropped. Each
/// custom column is then rescaled onto `[min(PC1), 2 * max(PC1)]`, where
/// PC1 is the first principal axis.
pub fn apply_custom_axes(
    data: &mut CoordData,
    axes: &[String],
    mapping: &MappingTable,
) -> Result<()> {
    let mut columns = DMatrix::from_element(data.len(), axes.len(), f64::NAN);
    for (c, axis) in axes.iter().enumerate() {
        let values = mapping.column_values(axis)?;
        for (r, id) in data.sample_ids.iter().enumerate() {
            if let Some(v) = values.get(id.as_str()).and_then(|v| v.trim().parse().ok()) {
                columns[(r, c)] = v;
            }
        }
    }

    data.prepend_columns(&columns);
    data.custom_axes.splice(0..0, axes.iter().cloned());
    let removed = data.remove_nans();
    if removed > 0 {
        warn!("Removed {removed} sample(s) with non-numeric custom axis values");
    }
    if data.is_empty() {
        return Err(crate::Error::NoSamplesInCommon);
    }

    scale_custom_coords(data, axes.len());
    info!("Using custom axes: {}", axes.join(", "));
    Ok(())
}

/// Affinely map each custom column onto the first principal axis' span.
fn scale_custom_coords(data: &mut CoordData, n_custom: usize) {
    if data.dimensions() <= n_custom {
        return;
    }
    let pc1 = data.coords.column(n_custom);
    let to_min = pc1.min();
    let to_max = 2.0 * pc1.max();

    for c in 0..n_custom {
        let mut column = data.coords.column_mut(c);
        let from_min = column.min();
        let from_max = column.max();
        let span = from_max - from_min;

        for v in column.iter_mut() {
            *v = if span == 0.0 {
                to_min
            } else {
                (*v - from_min) / span * (to_max - to_min) + to_min
            };
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn mapping() -> MappingTable {
        MappingTable {
            headers: vec!["SampleID".into(), "pH".into(), "Site".into()],
            rows: vec![
                vec!["A".into(), "6.0".into(), "x".into()],
                vec!["B".into(), "8.0".into(), "y".into()],
                vec!["C".into(), "n/a".into(), "z".into()],
                vec!["D".into(), "7.0".into(), "w".into()],
            ],
            comments: vec![],
        }
    }

    fn data() -> CoordData {
        CoordData {
            sample_ids: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            coords: DMatrix::from_row_slice(4, 2, &[-1.0, 0.0, 2.0, 1.0, 0.5, 0.5, 0.0, 0.0]),
            eigvals: vec![1.0, 0.5],
            pct_var: vec![60.0, 30.0],
            bounds: None,
            custom_axes: Vec::new(),
        }
    }

    #[test]
    fn test_process_custom_axes() {
        assert_eq!(
            process_custom_axes(" 'pH', \"Temp\" ,,"),
            vec!["pH".to_string(), "Temp".to_string()]
        );
    }

    #[test]
    fn test_apply_custom_axes_scales_and_drops_non_numeric() {
        let mut d = data();
        apply_custom_axes(&mut d, &["pH".to_string()], &mapping()).unwrap();

        assert_eq!(d.sample_ids, vec!["A", "B", "D"]);
        assert_eq!(d.custom_axes, vec!["pH"]);
        assert_eq!(d.dimensions(), 3);
        // PC1 of remaining samples spans [-1, 2] -> target [-1, 4]
        assert_eq!(d.coords[(0, 0)], -1.0);
        assert_eq!(d.coords[(1, 0)], 4.0);
        assert_eq!(d.coords[(2, 0)], 1.5);
    }

    #[test]
    fn test_apply_custom_axes_unknown_column() {
        let mut d = data();
        assert!(apply_custom_axes(&mut d, &["Temp".to_string()], &mapping()).is_err());
    }
}
