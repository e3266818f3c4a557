//! Trajectory vectors through ordered sample groups.
//!
//! `--add-vectors Subject,Day` connects the samples of each subject in day
//! order. The RMS statistics in [`rms`] summarize how far each group's
//! trajectory travels.

mod anova;
mod rms;

pub use anova::{AnovaResult, f_distribution_sf, one_way_anova, regularized_incomplete_beta};
pub use rms::{RmsResult, compute_rms, rms_output_path, run_rms, write_rms_file};

use crate::constants::MAX_VECTOR_COLUMNS;
use crate::error::{Error, Result};
use crate::parse::MappingTable;
use crate::utils::natural_cmp;
use std::cmp::Ordering;
use tracing::debug;

/// Columns selected with `--add-vectors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorColumns {
    /// Column whose values define the trajectories.
    pub group: String,
    /// Column ordering samples along each trajectory.
    pub order: Option<String>,
}

impl VectorColumns {
    /// Parse `group[,order]`, checking both columns exist.
    pub fn parse(spec: &str, mapping: &MappingTable) -> Result<Self> {
        let columns: Vec<&str> = spec
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();

        if columns.is_empty() {
            return Err(Error::invalid_option("--add-vectors requires a column name"));
        }
        if columns.len() > MAX_VECTOR_COLUMNS {
            return Err(Error::invalid_option(format!(
                "--add-vectors accepts at most {MAX_VECTOR_COLUMNS} columns, got {}",
                columns.len()
            )));
        }
        for column in &columns {
            mapping.require_column(column)?;
        }

        Ok(Self {
            group: columns[0].to_string(),
            order: columns.get(1).map(ToString::to_string),
        })
    }
}

/// Samples of one group in trajectory order.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Group value.
    pub name: String,
    /// Sample ids in order.
    pub sample_ids: Vec<String>,
    /// Order column value of each sample (the sample id without one).
    pub order_values: Vec<String>,
}

/// Compare order values numerically when both parse, naturally otherwise.
fn compare_order(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => natural_cmp(a, b),
    }
}

/// Build one trajectory per group from the kept samples.
pub fn make_trajectories(
    columns: &VectorColumns,
    mapping: &MappingTable,
    keep: impl Fn(&str) -> bool,
) -> Result<Vec<Trajectory>> {
    let order_values = match &columns.order {
        Some(column) => Some(mapping.column_values(column)?),
        None => None,
    };

    let mut trajectories = Vec::new();
    for (name, ids) in mapping.group_by(&columns.group)? {
        let mut samples: Vec<(String, String)> = ids
            .into_iter()
            .filter(|id| keep(id))
            .map(|id| {
                let order = order_values
                    .as_ref()
                    .and_then(|values| values.get(id.as_str()))
                    .map_or_else(|| id.clone(), ToString::to_string);
                (id, order)
            })
            .collect();
        if samples.is_empty() {
            continue;
        }
        samples.sort_by(|a, b| compare_order(&a.1, &b.1).then_with(|| natural_cmp(&a.0, &b.0)));

        let (sample_ids, order_values) = samples.into_iter().unzip();
        trajectories.push(Trajectory {
            name,
            sample_ids,
            order_values,
        });
    }

    trajectories.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    debug!("Built {} trajectories over '{}'", trajectories.len(), columns.group);
    Ok(trajectories)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mapping() -> MappingTable {
        let row = |id: &str, s: &str, d: &str| vec![id.to_string(), s.to_string(), d.to_string()];
        MappingTable {
            headers: vec!["SampleID".into(), "Subject".into(), "Day".into()],
            rows: vec![
                row("S1", "mouse2", "10"),
                row("S2", "mouse1", "2"),
                row("S3", "mouse1", "10"),
                row("S4", "mouse1", "1"),
                row("S5", "mouse2", "9"),
            ],
            comments: vec![],
        }
    }

    #[test]
    fn test_parse_vector_columns() {
        let m = mapping();
        let cols = VectorColumns::parse("Subject, Day", &m).unwrap();
        assert_eq!(cols.group, "Subject");
        assert_eq!(cols.order.as_deref(), Some("Day"));

        assert!(VectorColumns::parse("Subject,Day,SampleID", &m).is_err());
        assert!(matches!(
            VectorColumns::parse("Cage", &m),
            Err(Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_trajectories_ordered_numerically() {
        let m = mapping();
        let cols = VectorColumns::parse("Subject,Day", &m).unwrap();
        let trajectories = make_trajectories(&cols, &m, |_| true).unwrap();

        assert_eq!(trajectories.len(), 2);
        assert_eq!(trajectories[0].name, "mouse1");
        assert_eq!(trajectories[0].sample_ids, vec!["S4", "S2", "S3"]);
        assert_eq!(trajectories[1].sample_ids, vec!["S5", "S1"]);
    }

    #[test]
    fn test_trajectories_without_order_use_sample_ids() {
        let m = mapping();
        let cols = VectorColumns::parse("Subject", &m).unwrap();
        let trajectories = make_trajectories(&cols, &m, |id| id != "S3").unwrap();
        assert_eq!(trajectories[0].sample_ids, vec!["S2", "S4"]);
        assert_eq!(trajectories[0].order_values, vec!["S2", "S4"]);
    }
}
