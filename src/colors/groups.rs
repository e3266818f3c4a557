//! Color-by categories and per-group color assignment.

use super::palette::{DATA_COLORS, NamedColor, lookup};
use super::prefs::{ColorSpec, ColoringPref, Prefs};
use crate::constants::{COLORBY_ALL, COMBINE_SEPARATOR};
use crate::error::Result;
use crate::parse::MappingTable;
use crate::utils::natural_cmp;
use std::collections::HashSet;
use tracing::debug;

/// One metadata category to color by.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCategory {
    /// Label used in output names.
    pub key: String,
    /// Mapping column holding the group values.
    pub column: String,
    /// Coloring preferences for this category.
    pub pref: Option<ColoringPref>,
}

/// Samples sharing one category value, with their color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGroup {
    /// Category value.
    pub value: String,
    /// Sample ids in natural order.
    pub sample_ids: Vec<String>,
    /// Assigned color.
    pub color: NamedColor,
}

/// Resolve a mapping column, adding a combined column for `A&&B`.
fn resolve_column(column: &str, mapping: &mut MappingTable) -> Result<String> {
    if column.contains(COMBINE_SEPARATOR) {
        let parts: Vec<&str> = column
            .split(COMBINE_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        return mapping.add_combined_column(&parts);
    }
    mapping.require_column(column)?;
    Ok(column.to_string())
}

/// Work out which categories to color by.
///
/// Without `-b` (or with `ALL`) the prefs entries are used, or every
/// mapping column when there are none. With `-b` the listed categories are
/// used in order, each picking up the prefs entry that names its column.
pub fn process_colorby(
    colorby: Option<&str>,
    prefs: &Prefs,
    mapping: &mut MappingTable,
) -> Result<Vec<ColorCategory>> {
    let requested: Vec<String> = colorby
        .map(|c| {
            c.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let all = requested.is_empty() || requested.iter().any(|c| c == COLORBY_ALL);

    let mut categories = Vec::new();

    if all && prefs.sample_coloring.is_empty() {
        for column in mapping.headers.clone() {
            categories.push(ColorCategory {
                key: column.clone(),
                column,
                pref: None,
            });
        }
    } else if all {
        for (key, pref) in &prefs.sample_coloring {
            let column = resolve_column(&pref.column, mapping)?;
            categories.push(ColorCategory {
                key: key.clone(),
                column,
                pref: Some(pref.clone()),
            });
        }
    } else {
        for category in requested {
            let column = resolve_column(&category, mapping)?;
            let pref = prefs
                .sample_coloring
                .values()
                .find(|p| p.column == category || p.column == column)
                .cloned();
            categories.push(ColorCategory {
                key: category,
                column,
                pref,
            });
        }
    }

    debug!(
        "Coloring by: {}",
        categories
            .iter()
            .map(|c| c.key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(categories)
}

/// Replace characters that cannot appear in a kinemage color name.
fn color_name(prefix: &str, suffix: &str) -> String {
    format!("{prefix}_{suffix}")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// First of `base`, `base_1`, `base_2`... that is neither a palette color
/// nor already in `taken`.
fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    let mut name = base.clone();
    let mut n = 1;
    while lookup(&name).is_some() || !taken.insert(name.clone()) {
        name = format!("{base}_{n}");
        n += 1;
    }
    name
}

/// Group the kept samples of a category and assign each group a color.
///
/// Groups left without samples are skipped. Explicit prefs colors come
/// first, then the gradient, then unused palette colors in order. Every
/// explicit triple and gradient step gets its own color name.
pub fn assign_colors(
    category: &ColorCategory,
    mapping: &MappingTable,
    keep: impl Fn(&str) -> bool,
) -> Result<Vec<ColorGroup>> {
    let mut groups: Vec<(String, Vec<String>)> = mapping
        .group_by(&category.column)?
        .into_iter()
        .map(|(value, ids)| {
            let kept = ids.into_iter().filter(|id| keep(id)).collect::<Vec<_>>();
            (value, kept)
        })
        .filter(|(_, ids)| !ids.is_empty())
        .collect();
    groups.sort_by(|a, b| natural_cmp(&a.0, &b.0));

    let mut colors: Vec<Option<NamedColor>> = vec![None; groups.len()];
    let mut taken = HashSet::new();

    if let Some(pref) = &category.pref {
        for (i, (value, _)) in groups.iter().enumerate() {
            if let Some(spec) = pref.colors.get(value) {
                let mut color = spec.named(&color_name(&category.key, value))?;
                if matches!(spec, ColorSpec::Hsv(_)) {
                    color.name = unique_name(color.name, &mut taken);
                }
                colors[i] = Some(color);
            }
        }

        if let Some(gradient) = &pref.gradient {
            let start = gradient.start.hsv()?;
            let end = gradient.end.hsv()?;

            let mut pending: Vec<usize> =
                (0..groups.len()).filter(|&i| colors[i].is_none()).collect();
            let numeric: Option<Vec<f64>> = pending
                .iter()
                .map(|&i| groups[i].0.trim().parse::<f64>().ok())
                .collect();
            if let Some(values) = numeric {
                let mut order: Vec<(usize, f64)> = pending.iter().copied().zip(values).collect();
                order.sort_by(|a, b| a.1.total_cmp(&b.1));
                pending = order.into_iter().map(|(i, _)| i).collect();
            }

            let steps = pending.len().saturating_sub(1).max(1) as f64;
            for (step, &i) in pending.iter().enumerate() {
                let hsv = start.lerp(end, step as f64 / steps);
                let name = color_name(&category.key, &format!("grad{step}"));
                colors[i] = Some(NamedColor::new(unique_name(name, &mut taken), hsv));
            }
        }
    }

    let used: HashSet<String> = colors.iter().flatten().map(|c| c.name.clone()).collect();
    let mut palette = DATA_COLORS
        .iter()
        .filter(|(name, _)| !used.contains(*name))
        .chain(DATA_COLORS.iter().cycle())
        .map(|(name, hsv)| NamedColor::new(*name, *hsv));

    let mut result = Vec::with_capacity(groups.len());
    for ((value, sample_ids), color) in groups.into_iter().zip(colors) {
        // the palette cycles, so it never runs dry
        let Some(color) = color.or_else(|| palette.next()) else {
            continue;
        };
        result.push(ColorGroup {
            value,
            sample_ids,
            color,
        });
    }
    Ok(result)
}

/// Distinct colors used by a set of groups, in first-use order.
pub fn used_colors<'a>(groups: impl IntoIterator<Item = &'a ColorGroup>) -> Vec<NamedColor> {
    let mut seen = HashSet::new();
    groups
        .into_iter()
        .filter(|g| seen.insert(g.color.name.clone()))
        .map(|g| g.color.clone())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::colors::prefs::Gradient;
    use std::collections::BTreeMap;

    fn mapping() -> MappingTable {
        let row = |id: &str, t: &str, d: &str| vec![id.to_string(), t.to_string(), d.to_string()];
        MappingTable {
            headers: vec!["SampleID".into(), "Treatment".into(), "Day".into()],
            rows: vec![
                row("S1", "Control", "10"),
                row("S2", "Fast", "2"),
                row("S3", "Control", "1"),
                row("S4", "Fed", "2"),
            ],
            comments: vec![],
        }
    }

    fn prefs_with(column: &str, pref: ColoringPref) -> Prefs {
        let mut sample_coloring = BTreeMap::new();
        sample_coloring.insert(column.to_string(), pref);
        Prefs {
            sample_coloring,
            ..Prefs::default()
        }
    }

    #[test]
    fn test_colorby_defaults_to_all_columns() {
        let mut m = mapping();
        let cats = process_colorby(None, &Prefs::default(), &mut m).unwrap();
        let keys: Vec<_> = cats.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["SampleID", "Treatment", "Day"]);

        let all = process_colorby(Some("ALL"), &Prefs::default(), &mut m).unwrap();
        assert_eq!(all, cats);
    }

    #[test]
    fn test_colorby_combined_columns() {
        let mut m = mapping();
        let cats = process_colorby(Some("Treatment&&Day"), &Prefs::default(), &mut m).unwrap();
        assert_eq!(cats[0].column, "Treatment&&Day");
        assert_eq!(m.column_values("Treatment&&Day").unwrap()["S2"], "Fast2");
    }

    #[test]
    fn test_colorby_unknown_column() {
        let mut m = mapping();
        assert!(process_colorby(Some("pH"), &Prefs::default(), &mut m).is_err());
    }

    #[test]
    fn test_colorby_picks_up_prefs_entry() {
        let mut m = mapping();
        let prefs = prefs_with(
            "treat",
            ColoringPref {
                column: "Treatment".into(),
                ..ColoringPref::default()
            },
        );
        let cats = process_colorby(Some("Day,Treatment"), &prefs, &mut m).unwrap();
        assert!(cats[0].pref.is_none());
        assert!(cats[1].pref.is_some());

        let from_prefs = process_colorby(None, &prefs, &mut m).unwrap();
        assert_eq!(from_prefs.len(), 1);
        assert_eq!(from_prefs[0].key, "treat");
    }

    #[test]
    fn test_palette_assignment_in_natural_order() {
        let m = mapping();
        let cat = ColorCategory {
            key: "Day".into(),
            column: "Day".into(),
            pref: None,
        };
        let groups = assign_colors(&cat, &m, |_| true).unwrap();
        let values: Vec<_> = groups.iter().map(|g| g.value.as_str()).collect();
        assert_eq!(values, vec!["1", "2", "10"]);
        assert_eq!(groups[0].color.name, "red1");
        assert_eq!(groups[1].color.name, "blue1");
        assert_eq!(groups[1].sample_ids, vec!["S2", "S4"]);
    }

    #[test]
    fn test_explicit_color_is_not_reused() {
        let m = mapping();
        let mut colors = BTreeMap::new();
        colors.insert("Fast".to_string(), ColorSpec::Name("red1".into()));
        let cat = ColorCategory {
            key: "Treatment".into(),
            column: "Treatment".into(),
            pref: Some(ColoringPref {
                column: "Treatment".into(),
                colors,
                gradient: None,
            }),
        };
        let groups = assign_colors(&cat, &m, |_| true).unwrap();
        let names: Vec<_> = groups.iter().map(|g| g.color.name.as_str()).collect();
        assert_eq!(names, vec!["blue1", "red1", "orange1"]);
    }

    #[test]
    fn test_gradient_uses_numeric_order() {
        let m = mapping();
        let cat = ColorCategory {
            key: "Day".into(),
            column: "Day".into(),
            pref: Some(ColoringPref {
                column: "Day".into(),
                colors: BTreeMap::new(),
                gradient: Some(Gradient {
                    start: ColorSpec::Hsv([0.0, 100.0, 100.0]),
                    end: ColorSpec::Hsv([240.0, 100.0, 100.0]),
                }),
            }),
        };
        let groups = assign_colors(&cat, &m, |_| true).unwrap();
        assert_eq!(groups[0].color.hsv.h, 0.0);
        assert_eq!(groups[1].color.hsv.h, 120.0);
        assert_eq!(groups[2].color.hsv.h, 240.0);
        assert_eq!(groups[2].color.name, "Day_grad2");
    }

    #[test]
    fn test_explicit_and_gradient_names_are_unique() {
        let m = mapping();
        let mut colors = BTreeMap::new();
        colors.insert("1".to_string(), ColorSpec::Hsv([120.0, 100.0, 100.0]));
        let cat = ColorCategory {
            key: "Day".into(),
            column: "Day".into(),
            pref: Some(ColoringPref {
                column: "Day".into(),
                colors,
                gradient: Some(Gradient {
                    start: ColorSpec::Hsv([0.0, 100.0, 100.0]),
                    end: ColorSpec::Hsv([240.0, 100.0, 100.0]),
                }),
            }),
        };
        let groups = assign_colors(&cat, &m, |_| true).unwrap();
        let names: Vec<_> = groups.iter().map(|g| g.color.name.as_str()).collect();
        assert_eq!(names, vec!["Day_1", "Day_grad0", "Day_grad1"]);
        assert_eq!(groups[0].color.hsv.h, 120.0);
        assert_eq!(groups[2].color.hsv.h, 240.0);
        assert_eq!(used_colors(&groups).len(), 3);
    }

    #[test]
    fn test_sanitized_names_do_not_collide() {
        let row = |id: &str, site: &str| vec![id.to_string(), site.to_string()];
        let m = MappingTable {
            headers: vec!["SampleID".into(), "Site".into()],
            rows: vec![row("S1", "a b"), row("S2", "a_b")],
            comments: vec![],
        };
        let mut colors = BTreeMap::new();
        colors.insert("a b".to_string(), ColorSpec::Hsv([10.0, 50.0, 50.0]));
        colors.insert("a_b".to_string(), ColorSpec::Hsv([200.0, 50.0, 50.0]));
        let cat = ColorCategory {
            key: "Site".into(),
            column: "Site".into(),
            pref: Some(ColoringPref {
                column: "Site".into(),
                colors,
                gradient: None,
            }),
        };
        let groups = assign_colors(&cat, &m, |_| true).unwrap();
        let declared = used_colors(&groups);
        assert_eq!(declared.len(), 2);
        assert_ne!(groups[0].color.name, groups[1].color.name);
    }

    #[test]
    fn test_empty_groups_skipped() {
        let m = mapping();
        let cat = ColorCategory {
            key: "Treatment".into(),
            column: "Treatment".into(),
            pref: None,
        };
        let groups = assign_colors(&cat, &m, |id| id != "S4").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(used_colors(&groups).len(), 2);
    }
}
