//! Input table parsing.
//!
//! Coordinates, mapping, and taxa files are all tab-separated text with
//! `#`-prefixed header or comment lines. They are read with the `csv`
//! crate in unquoted, flexible mode.

mod coords;
mod mapping;
mod taxa;

pub use coords::{Coordinates, coord_file_paths, parse_coords, validate_coord_files};
pub use mapping::{MappingTable, parse_mapping_file};
pub use taxa::{TaxaTable, parse_taxa_file};

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;

/// Open a tab-separated file for record-by-record reading.
fn tab_reader(path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .map_err(|e| Error::InputRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
}

/// Read every non-blank record with its one-based line number.
fn read_records(path: &Path) -> Result<Vec<(usize, csv::StringRecord)>> {
    let mut reader = tab_reader(path)?;
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| Error::InputRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        let line = record
            .position()
            .map_or(records.len() + 1, |p| usize::try_from(p.line()).unwrap_or(0));

        let blank = record.iter().all(|field| field.trim().is_empty());
        if !blank {
            records.push((line, record));
        }
    }

    Ok(records)
}

/// Parse a numeric cell, mapping `NA`/`nan` to NaN.
fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("na") || trimmed.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    trimmed.parse().ok()
}
