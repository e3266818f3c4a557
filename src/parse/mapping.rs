//! Sample metadata mapping file parsing.

use super::read_records;
use crate::constants::COMBINE_SEPARATOR;
use crate::error::{Error, Result};
use crate::utils::natural_sort;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// A parsed mapping file.
///
/// The first column always holds the sample id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    /// Column names, with the header's leading `#` removed.
    pub headers: Vec<String>,
    /// One row per sample, aligned with `headers`.
    pub rows: Vec<Vec<String>>,
    /// Comment lines (without the leading `#`).
    pub comments: Vec<String>,
}

impl MappingTable {
    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column by name, or an error naming the column.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| Error::UnknownColumn {
            column: name.to_string(),
        })
    }

    /// Sample ids in file order.
    pub fn sample_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row[0].as_str())
    }

    /// Map each sample id to its value in a column.
    pub fn column_values(&self, name: &str) -> Result<HashMap<&str, &str>> {
        let idx = self.require_column(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| (row[0].as_str(), row[idx].as_str()))
            .collect())
    }

    /// Group sample ids by their value in a column.
    ///
    /// Sample ids within a group are in natural order.
    pub fn group_by(&self, name: &str) -> Result<BTreeMap<String, Vec<String>>> {
        let idx = self.require_column(name)?;
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in &self.rows {
            groups
                .entry(row[idx].clone())
                .or_default()
                .push(row[0].clone());
        }
        for ids in groups.values_mut() {
            natural_sort(ids);
        }
        Ok(groups)
    }

    /// Append a column combining several existing ones.
    ///
    /// The new column is named `A&&B` and each value is the concatenation
    /// of the source values. Returns the new column name. Combining the
    /// same columns twice reuses the existing column.
    pub fn add_combined_column(&mut self, columns: &[&str]) -> Result<String> {
        let indices = columns
            .iter()
            .map(|c| self.require_column(c))
            .collect::<Result<Vec<_>>>()?;
        let name = columns.join(COMBINE_SEPARATOR);

        if self.column_index(&name).is_some() {
            return Ok(name);
        }

        for row in &mut self.rows {
            let combined: String = indices.iter().map(|&i| row[i].as_str()).collect();
            row.push(combined);
        }
        self.headers.push(name.clone());
        Ok(name)
    }

    /// Whether a sample id is present.
    pub fn contains_sample(&self, sample_id: &str) -> bool {
        self.sample_ids().any(|id| id == sample_id)
    }
}

/// Parse a tab-separated mapping file.
///
/// The first `#` line is the header; later `#` lines are comments.
pub fn parse_mapping_file(path: &Path) -> Result<MappingTable> {
    let records = read_records(path)?;
    let format_err = |line: usize, message: String| Error::MappingFormat {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut comments = Vec::new();

    for (line, record) in records {
        let fields: Vec<String> = record.iter().map(|f| f.trim().to_string()).collect();
        let first = fields.first().map_or("", String::as_str);

        if let Some(stripped) = first.strip_prefix('#') {
            if headers.is_none() {
                let mut header = fields.clone();
                header[0] = stripped.trim().to_string();
                headers = Some(header);
            } else {
                comments.push(fields.join("\t").trim_start_matches('#').to_string());
            }
            continue;
        }

        let Some(header) = headers.as_ref() else {
            return Err(format_err(line, "data row before '#SampleID' header".to_string()));
        };

        if fields.len() < header.len() {
            return Err(format_err(
                line,
                format!("expected {} columns, found {}", header.len(), fields.len()),
            ));
        }
        let mut row = fields;
        row.truncate(header.len());
        rows.push(row);
    }

    let headers = headers.ok_or_else(|| format_err(1, "missing '#SampleID' header".to_string()))?;

    Ok(MappingTable {
        headers,
        rows,
        comments,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MAPPING: &str = "#SampleID\tTreatment\tDOB\tDescription
#Example mapping file
PC.354\tControl\t20061218\tControl_mouse_I.D._354
PC.355\tControl\t20061218\tControl_mouse_I.D._355
PC.636\tFast\t20080116\tFasting_mouse_I.D._636
";

    fn mapping() -> MappingTable {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MAPPING.as_bytes()).unwrap();
        file.flush().unwrap();
        parse_mapping_file(file.path()).unwrap()
    }

    #[test]
    fn test_parse_mapping() {
        let table = mapping();
        assert_eq!(
            table.headers,
            vec!["SampleID", "Treatment", "DOB", "Description"]
        );
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.comments, vec!["Example mapping file"]);
        assert!(table.contains_sample("PC.636"));
    }

    #[test]
    fn test_group_by() {
        let table = mapping();
        let groups = table.group_by("Treatment").unwrap();
        assert_eq!(groups["Control"], vec!["PC.354", "PC.355"]);
        assert_eq!(groups["Fast"], vec!["PC.636"]);
    }

    #[test]
    fn test_group_by_unknown_column() {
        let table = mapping();
        assert!(matches!(
            table.group_by("pH"),
            Err(Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_add_combined_column() {
        let mut table = mapping();
        let name = table.add_combined_column(&["Treatment", "DOB"]).unwrap();
        assert_eq!(name, "Treatment&&DOB");
        let values = table.column_values(&name).unwrap();
        assert_eq!(values["PC.636"], "Fast20080116");

        // combining again reuses the column
        table.add_combined_column(&["Treatment", "DOB"]).unwrap();
        assert_eq!(table.headers.len(), 5);
    }

    #[test]
    fn test_short_row_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "#SampleID\tTreatment\nS1").unwrap();
        file.flush().unwrap();
        assert!(matches!(
            parse_mapping_file(file.path()),
            Err(Error::MappingFormat { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_header_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "S1\tControl").unwrap();
        file.flush().unwrap();
        assert!(parse_mapping_file(file.path()).is_err());
    }
}
