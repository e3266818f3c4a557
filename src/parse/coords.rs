//! Principal coordinates file parsing.

use super::{parse_number, read_records};
use crate::error::{Error, Result};
use nalgebra::DMatrix;
use std::path::{Path, PathBuf};

/// Contents of one principal coordinates file.
#[derive(Debug, Clone)]
pub struct Coordinates {
    /// Sample ids, one per matrix row.
    pub sample_ids: Vec<String>,
    /// Sample-by-axis coordinate matrix.
    pub matrix: DMatrix<f64>,
    /// Eigenvalue of each axis.
    pub eigvals: Vec<f64>,
    /// Percent of variation explained by each axis.
    pub pct_var: Vec<f64>,
}

impl Coordinates {
    /// Number of axes.
    pub fn dimensions(&self) -> usize {
        self.matrix.ncols()
    }
}

enum Section {
    Samples,
    Trailer,
}

/// Parse a principal coordinates file.
///
/// Layout:
///
/// ```text
/// pc vector number	1	2	3
/// S1	0.1	0.2	0.3
/// S2	...
///
/// eigvals	4.9	2.1	1.0
/// % variation explained	51.6	22.0	10.5
/// ```
pub fn parse_coords(path: &Path) -> Result<Coordinates> {
    let records = read_records(path)?;
    let format_err = |line: usize, message: String| Error::CoordsFormat {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut iter = records.into_iter();
    let (_, header) = iter
        .next()
        .ok_or_else(|| format_err(1, "file is empty".to_string()))?;
    let dims = header.len().saturating_sub(1);
    if dims == 0 {
        return Err(format_err(1, "header has no axis columns".to_string()));
    }

    let mut sample_ids = Vec::new();
    let mut values = Vec::new();
    let mut eigvals = None;
    let mut pct_var = None;
    let mut section = Section::Samples;

    for (line, record) in iter {
        let label = record.get(0).unwrap_or_default().trim();
        let row: Vec<f64> = record
            .iter()
            .skip(1)
            .map(|cell| {
                parse_number(cell).ok_or_else(|| format_err(line, format!("'{cell}' is not a number")))
            })
            .collect::<Result<_>>()?;

        if row.len() != dims {
            return Err(format_err(
                line,
                format!("expected {dims} values, found {}", row.len()),
            ));
        }

        if label.eq_ignore_ascii_case("eigvals") {
            section = Section::Trailer;
            eigvals = Some(row);
        } else if label.to_ascii_lowercase().starts_with("% variation explained") {
            section = Section::Trailer;
            pct_var = Some(row);
        } else {
            if matches!(section, Section::Trailer) {
                return Err(format_err(
                    line,
                    format!("unexpected row '{label}' after eigenvalues"),
                ));
            }
            sample_ids.push(label.to_string());
            values.extend(row);
        }
    }

    let eigvals = eigvals.ok_or_else(|| format_err(0, "missing eigvals row".to_string()))?;
    let pct_var =
        pct_var.ok_or_else(|| format_err(0, "missing % variation explained row".to_string()))?;
    if sample_ids.is_empty() {
        return Err(format_err(0, "no sample rows".to_string()));
    }

    let matrix = DMatrix::from_row_slice(sample_ids.len(), dims, &values);

    Ok(Coordinates {
        sample_ids,
        matrix,
        eigvals,
        pct_var,
    })
}

/// List the coordinate files behind a path.
///
/// A file yields itself. A directory yields its non-hidden files in name
/// order.
pub fn coord_file_paths(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let read_error = |e: std::io::Error| Error::InputRead {
        path: path.to_path_buf(),
        source: Box::new(e),
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::NoCoordFiles {
            path: path.to_path_buf(),
        });
    }
    Ok(files)
}

/// Check that every line of every coordinate file has the same column count.
pub fn validate_coord_files(path: &Path) -> Result<()> {
    for file in coord_file_paths(path)? {
        let records = read_records(&file)?;
        let Some((_, first)) = records.first() else {
            continue;
        };
        let expected = first.len();
        if records.iter().any(|(_, r)| r.len() != expected) {
            return Err(Error::InconsistentColumns { path: file });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const COORDS: &str = "pc vector number\t1\t2\t3
PC.354\t0.28\t-0.02\t0.05
PC.355\t0.17\t0.08\t-0.11
PC.356\t-0.23\t0.14\t0.02

eigvals\t0.48\t0.16\t0.09
% variation explained\t51.6\t17.1\t9.9
";

    fn write_coords(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_coords() {
        let file = write_coords(COORDS);
        let coords = parse_coords(file.path()).unwrap();

        assert_eq!(coords.sample_ids, vec!["PC.354", "PC.355", "PC.356"]);
        assert_eq!(coords.dimensions(), 3);
        assert_eq!(coords.matrix[(1, 2)], -0.11);
        assert_eq!(coords.eigvals, vec![0.48, 0.16, 0.09]);
        assert_eq!(coords.pct_var, vec![51.6, 17.1, 9.9]);
    }

    #[test]
    fn test_parse_coords_missing_trailer() {
        let file = write_coords("pc vector number\t1\t2\nS1\t0.1\t0.2\n");
        assert!(matches!(
            parse_coords(file.path()),
            Err(Error::CoordsFormat { .. })
        ));
    }

    #[test]
    fn test_parse_coords_bad_number_reports_line() {
        let file = write_coords(
            "pc vector number\t1\t2\nS1\t0.1\tabc\n\neigvals\t1\t1\n% variation explained\t50\t50\n",
        );
        match parse_coords(file.path()) {
            Err(Error::CoordsFormat { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_consistent_file() {
        let file = write_coords(COORDS);
        assert!(validate_coord_files(file.path()).is_ok());
    }

    #[test]
    fn test_validate_ragged_file() {
        let file = write_coords("pc vector number\t1\t2\nS1\t0.1\n");
        assert!(matches!(
            validate_coord_files(file.path()),
            Err(Error::InconsistentColumns { .. })
        ));
    }

    #[test]
    fn test_coord_file_paths_skips_hidden() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.txt"), COORDS).unwrap();
        std::fs::write(dir.path().join("a.txt"), COORDS).unwrap();
        std::fs::write(dir.path().join(".DS_Store"), "junk").unwrap();

        let files = coord_file_paths(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_coord_file_paths_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            coord_file_paths(dir.path()),
            Err(Error::NoCoordFiles { .. })
        ));
    }
}
