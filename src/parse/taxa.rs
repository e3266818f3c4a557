//! Summarized taxa table parsing.

use super::{parse_number, read_records};
use crate::error::{Error, Result};
use nalgebra::DMatrix;
use std::path::Path;

/// Taxon-by-sample count table.
#[derive(Debug, Clone)]
pub struct TaxaTable {
    /// Sample ids, one per matrix column.
    pub sample_ids: Vec<String>,
    /// Lineage strings, one per matrix row.
    pub lineages: Vec<String>,
    /// Taxon-by-sample counts.
    pub counts: DMatrix<f64>,
}

impl TaxaTable {
    /// Restrict and reorder columns to the given sample ids.
    pub fn select_samples(&self, sample_ids: &[String]) -> Result<Self> {
        let indices = sample_ids
            .iter()
            .map(|id| {
                self.sample_ids
                    .iter()
                    .position(|s| s == id)
                    .ok_or_else(|| Error::TaxaSampleMissing { sample: id.clone() })
            })
            .collect::<Result<Vec<_>>>()?;

        let counts = self.counts.select_columns(indices.iter());
        Ok(Self {
            sample_ids: sample_ids.to_vec(),
            lineages: self.lineages.clone(),
            counts,
        })
    }
}

/// Parse a summarized taxa table.
///
/// The header may start with `#` (as in `#OTU ID`). Other `#` lines
/// without a tab are comments. Lineages whose counts are all zero are
/// dropped.
pub fn parse_taxa_file(path: &Path) -> Result<TaxaTable> {
    let records = read_records(path)?;
    let format_err = |line: usize, message: String| Error::TaxaFormat {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut sample_ids: Option<Vec<String>> = None;
    let mut lineages = Vec::new();
    let mut values = Vec::new();

    for (line, record) in records {
        let first = record.get(0).unwrap_or_default().trim();

        if sample_ids.is_none() {
            if first.starts_with('#') && record.len() < 2 {
                continue;
            }
            sample_ids = Some(record.iter().skip(1).map(|s| s.trim().to_string()).collect());
            continue;
        }
        if first.starts_with('#') {
            continue;
        }

        let expected = sample_ids.as_ref().map_or(0, Vec::len);
        let row: Vec<f64> = record
            .iter()
            .skip(1)
            .map(|cell| {
                parse_number(cell)
                    .filter(|v| !v.is_nan())
                    .ok_or_else(|| format_err(line, format!("'{cell}' is not a count")))
            })
            .collect::<Result<_>>()?;
        if row.len() != expected {
            return Err(format_err(
                line,
                format!("expected {expected} counts, found {}", row.len()),
            ));
        }

        if row.iter().all(|v| *v == 0.0) {
            continue;
        }
        lineages.push(first.to_string());
        values.extend(row);
    }

    let sample_ids = sample_ids.ok_or_else(|| format_err(1, "missing header".to_string()))?;
    let counts = DMatrix::from_row_slice(lineages.len(), sample_ids.len(), &values);

    Ok(TaxaTable {
        sample_ids,
        lineages,
        counts,
    })
}
