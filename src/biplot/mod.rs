//! Taxonomic biplot markers.
//!
//! Each taxon is placed at the abundance-weighted mean of the sample
//! coordinates and sized by its prevalence across samples.

use crate::coords::CoordData;
use crate::error::Result;
use crate::output::write_output_file;
use crate::parse::{TaxaTable, parse_taxa_file};
use nalgebra::DMatrix;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// A taxon positioned in coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxon {
    /// Full lineage string.
    pub lineage: String,
    /// Position, one value per coordinate axis.
    pub coords: Vec<f64>,
    /// Prevalence scaled to `0..=1`.
    pub prevalence: f64,
}

impl Taxon {
    /// Display name: the most specific lineage level.
    pub fn label(&self) -> &str {
        self.lineage
            .rsplit(';')
            .map(str::trim)
            .find(|level| !level.is_empty())
            .unwrap_or(&self.lineage)
    }
}

/// Relative prevalence of each taxon, min-max scaled to `0..=1`.
///
/// Sample columns are normalized to sum 1 before summing each taxon row.
/// When every taxon is equally prevalent all get 1.
pub fn compute_prevalence(counts: &DMatrix<f64>) -> Vec<f64> {
    let mut normalized = counts.clone();
    for mut column in normalized.column_iter_mut() {
        let total = column.sum();
        if total > 0.0 {
            column /= total;
        }
    }

    let sums: Vec<f64> = normalized.row_iter().map(|row| row.sum()).collect();
    let grand: f64 = sums.iter().sum();
    let relative: Vec<f64> = sums
        .iter()
        .map(|s| if grand > 0.0 { s / grand } else { 0.0 })
        .collect();

    let min = relative.iter().copied().fold(f64::INFINITY, f64::min);
    let max = relative.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    relative
        .iter()
        .map(|v| if span > 0.0 { (v - min) / span } else { 1.0 })
        .collect()
}

/// Keep the `n` most prevalent taxa, most prevalent first.
///
/// `n <= 0`, or `n` at least the number of taxa, keeps everything.
pub fn remove_rare_taxa(taxa: &TaxaTable, prevalence: &[f64], n: i64) -> (TaxaTable, Vec<f64>) {
    let mut order: Vec<usize> = (0..taxa.lineages.len()).collect();
    order.sort_by(|&a, &b| prevalence[b].total_cmp(&prevalence[a]));

    if let Ok(keep) = usize::try_from(n)
        && keep > 0
    {
        order.truncate(keep);
    }

    let table = TaxaTable {
        sample_ids: taxa.sample_ids.clone(),
        lineages: order.iter().map(|&i| taxa.lineages[i].clone()).collect(),
        counts: taxa.counts.select_rows(order.iter()),
    };
    let kept = order.iter().map(|&i| prevalence[i]).collect();
    (table, kept)
}

/// Place taxa at the abundance-weighted mean of the sample coordinates.
///
/// `taxa` columns must be in the same order as `coords` rows. Taxa absent
/// from every plotted sample are dropped.
pub fn make_biplot_scores(
    taxa: &TaxaTable,
    prevalence: &[f64],
    coords: &DMatrix<f64>,
) -> Vec<Taxon> {
    let mut weights = taxa.counts.clone();
    for mut row in weights.row_iter_mut() {
        let total = row.sum();
        if total > 0.0 {
            row /= total;
        }
    }
    let positions = weights * coords;

    taxa.lineages
        .iter()
        .enumerate()
        .filter(|(i, _)| taxa.counts.row(*i).sum() > 0.0)
        .map(|(i, lineage)| Taxon {
            lineage: lineage.clone(),
            coords: positions.row(i).iter().copied().collect(),
            prevalence: prevalence[i],
        })
        .collect()
}

/// Load a taxa table and position its most prevalent taxa.
pub fn load_biplot_taxa(path: &Path, data: &CoordData, n_taxa_keep: i64) -> Result<Vec<Taxon>> {
    let table = parse_taxa_file(path)?.select_samples(&data.sample_ids)?;
    let prevalence = compute_prevalence(&table.counts);
    let (table, prevalence) = remove_rare_taxa(&table, &prevalence, n_taxa_keep);
    let taxa = make_biplot_scores(&table, &prevalence, &data.coords);

    info!("Plotting {} taxa from {}", taxa.len(), path.display());
    Ok(taxa)
}

/// Write taxon coordinates as `#Taxon\tpc1\tpc2...`.
pub fn write_biplot_scores(path: &Path, taxa: &[Taxon]) -> Result<()> {
    let dims = taxa.first().map_or(0, |t| t.coords.len());

    write_output_file(path, |writer| {
        write!(writer, "#Taxon")?;
        for i in 1..=dims {
            write!(writer, "\tpc{i}")?;
        }
        writeln!(writer)?;

        for taxon in taxa {
            write!(writer, "{}", taxon.lineage)?;
            for v in &taxon.coords {
                write!(writer, "\t{v}")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    })?;

    debug!("Wrote biplot scores to {}", path.display());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> TaxaTable {
        TaxaTable {
            sample_ids: vec!["A".into(), "B".into()],
            lineages: vec![
                "Bacteria;Firmicutes".into(),
                "Bacteria;Bacteroidetes".into(),
                "Bacteria;Other;".into(),
            ],
            counts: DMatrix::from_row_slice(3, 2, &[6.0, 2.0, 2.0, 2.0, 2.0, 0.0]),
        }
    }

    #[test]
    fn test_compute_prevalence() {
        let prevalence = compute_prevalence(&table().counts);
        // normalized sums: 0.6+0.5, 0.2+0.5, 0.2+0.0
        assert_eq!(prevalence[0], 1.0);
        assert_eq!(prevalence[2], 0.0);
        assert!((prevalence[1] - 0.5 / 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_compute_prevalence_all_equal() {
        let counts = DMatrix::from_element(2, 2, 3.0);
        assert_eq!(compute_prevalence(&counts), vec![1.0, 1.0]);
    }

    #[test]
    fn test_remove_rare_taxa() {
        let t = table();
        let prevalence = compute_prevalence(&t.counts);

        let (kept, kept_prev) = remove_rare_taxa(&t, &prevalence, 2);
        assert_eq!(kept.lineages, vec!["Bacteria;Firmicutes", "Bacteria;Bacteroidetes"]);
        assert_eq!(kept_prev.len(), 2);

        let (all, _) = remove_rare_taxa(&t, &prevalence, -1);
        assert_eq!(all.lineages.len(), 3);
        let (all, _) = remove_rare_taxa(&t, &prevalence, 50);
        assert_eq!(all.lineages.len(), 3);
    }

    #[test]
    fn test_make_biplot_scores_weighted_mean() {
        let t = table();
        let coords = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, -1.0]);
        let taxa = make_biplot_scores(&t, &[1.0, 0.5, 0.0], &coords);

        assert_eq!(taxa[0].coords, vec![0.25, 0.5]);
        assert_eq!(taxa[1].coords, vec![0.5, 0.0]);
        assert_eq!(taxa[2].coords, vec![0.0, 1.0]);
        assert_eq!(taxa[2].label(), "Other");
    }

    #[test]
    fn test_write_biplot_scores() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("biplot.txt");
        let taxa = vec![Taxon {
            lineage: "Bacteria;Firmicutes".into(),
            coords: vec![0.5, -1.0],
            prevalence: 1.0,
        }];
        write_biplot_scores(&path, &taxa).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "#Taxon\tpc1\tpc2\nBacteria;Firmicutes\t0.5\t-1\n");
    }
}
