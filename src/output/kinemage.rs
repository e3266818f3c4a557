//! Kinemage text generation for the KiNG viewer.

use super::ellipsoid::{Triangle, ellipsoid, unit_sphere};
use crate::biplot::Taxon;
use crate::colors::{ColorGroup, NamedColor, PlotStyle, lookup, used_colors};
use crate::config::BackgroundColor;
use crate::constants::kinemage::{
    AXIS_LABEL_OFFSET, MAX_TAXON_RADIUS, MIN_TAXON_RADIUS, POINT_ALPHA, RADIUS_RATIO,
    TAXON_ALPHA, VISIBLE_AXES,
};
use crate::coords::CoordData;
use crate::vectors::Trajectory;
use nalgebra::DMatrix;
use std::io::{self, Write};

/// Settings shared by every kinemage of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct KinemageOptions {
    /// Maximum number of axes written.
    pub num_coords: usize,
    /// Ellipsoid subdivision level.
    pub ellipsoid_smoothness: u8,
    /// Ellipsoid opacity.
    pub ellipsoid_opacity: f64,
}

/// Everything drawn in one kinemage besides the sample groups.
#[derive(Debug, Clone, Copy)]
pub struct Overlays<'a> {
    /// Biplot taxa, positioned in the same space as the samples.
    pub taxa: &'a [Taxon],
    /// Trajectory vectors.
    pub trajectories: &'a [Trajectory],
}

/// Multiply each axis by its share of the largest percent variation.
pub fn scale_coords(coords: &DMatrix<f64>, axis_pct: &[f64]) -> DMatrix<f64> {
    let max = axis_pct.iter().copied().fold(0.0, f64::max);
    let mut scaled = coords.clone();
    if max <= 0.0 {
        return scaled;
    }
    for (j, mut column) in scaled.column_iter_mut().enumerate() {
        let factor = axis_pct.get(j).map_or(1.0, |p| p / max);
        column *= factor;
    }
    scaled
}

/// Ball radius: a fixed fraction of the first axis' range.
pub fn auto_radius(coords: &DMatrix<f64>, ball_scale: f64) -> f64 {
    if coords.nrows() == 0 || coords.ncols() == 0 {
        return RADIUS_RATIO * ball_scale;
    }
    let first = coords.column(0);
    let range = first.max() - first.min();
    RADIUS_RATIO * range * ball_scale
}

fn write_point<W: Write>(
    out: &mut W,
    label: &str,
    values: impl IntoIterator<Item = f64>,
) -> io::Result<()> {
    write!(out, "{{{label}}}")?;
    for v in values {
        write!(out, " {v}")?;
    }
    writeln!(out)
}

/// Writes one `@kinemage` block.
struct MageBuilder<'a, W: Write> {
    out: &'a mut W,
    sample_ids: &'a [String],
    coords: DMatrix<f64>,
    bounds: Option<(DMatrix<f64>, DMatrix<f64>)>,
    labels: Vec<String>,
    radius: f64,
    dims: usize,
    style: &'a PlotStyle,
}

impl<W: Write> MageBuilder<'_, W> {
    fn row(&self, idx: usize) -> Vec<f64> {
        self.coords.row(idx).iter().copied().take(self.dims).collect()
    }

    fn header(&mut self, name: &str, colors: &[NamedColor], has_taxa: bool) -> io::Result<()> {
        let dims = self.dims;
        writeln!(self.out, "@kinemage {{{name}}}")?;

        let dimension: Vec<String> = self.labels.iter().map(|l| format!("{{{l}}}")).collect();
        writeln!(self.out, "@dimension {}", dimension.join(" "))?;

        let minmax: Vec<String> = (0..dims)
            .map(|j| {
                let column = self.coords.column(j);
                format!("{} {}", column.min(), column.max())
            })
            .collect();
        writeln!(self.out, "@dimminmax {}", minmax.join(" "))?;

        writeln!(self.out, "@master {{points}}\n@master {{labels}}")?;
        if has_taxa {
            writeln!(self.out, "@master {{taxa_points}}\n@master {{taxa_labels}}")?;
        }

        let style = self.style;
        let background = if style.background == BackgroundColor::White {
            writeln!(self.out, "@whitebackground")?;
            lookup("black")
        } else {
            lookup("white")
        };

        let fixed = [
            &style.label_color,
            &style.arrow_line_color,
            &style.arrow_head_color,
        ];
        let mut declared: Vec<&str> = Vec::new();
        for color in colors.iter().chain(fixed).chain(background.as_ref()) {
            if declared.contains(&color.name.as_str()) {
                continue;
            }
            declared.push(&color.name);
            writeln!(self.out, "{color}")?;
        }
        Ok(())
    }

    fn group(
        &mut self,
        group: &ColorGroup,
        options: &KinemageOptions,
        mesh: &[Triangle],
    ) -> io::Result<()> {
        let indices: Vec<usize> = group
            .sample_ids
            .iter()
            .filter_map(|id| self.sample_ids.iter().position(|s| s == id))
            .collect();
        if indices.is_empty() {
            return Ok(());
        }

        let (dims, radius, color) = (self.dims, self.radius, &group.color.name);
        writeln!(
            self.out,
            "@group {{{} (n={})}} collapsible",
            group.value,
            indices.len()
        )?;
        writeln!(
            self.out,
            "@balllist color={color} radius={radius} alpha={POINT_ALPHA} dimension={dims} master={{points}} nobutton"
        )?;
        for &i in &indices {
            let values = self.row(i);
            write_point(self.out, &self.sample_ids[i], values)?;
        }

        if self.bounds.is_some() && dims >= 3 {
            for &i in &indices {
                self.ellipsoid(i, color, options, mesh)?;
            }
        }

        writeln!(
            self.out,
            "@labellist color={color} radius={radius} alpha={POINT_ALPHA} dimension={dims} master={{labels}} nobutton"
        )?;
        for &i in &indices {
            let values = self.row(i);
            write_point(self.out, &self.sample_ids[i], values)?;
        }
        Ok(())
    }

    fn ellipsoid(
        &mut self,
        i: usize,
        color: &str,
        options: &KinemageOptions,
        mesh: &[Triangle],
    ) -> io::Result<()> {
        let Some((low, high)) = &self.bounds else {
            return Ok(());
        };
        let point = self.row(i);
        let half = |j: usize| (high[(i, j)] - low[(i, j)]).abs() / 2.0;
        let center = [point[0], point[1], point[2]];
        let radii = [half(0), half(1), half(2)];

        for tri in ellipsoid(mesh, center, radii) {
            writeln!(
                self.out,
                "@trianglelist color={color} alpha={} master={{points}} nobutton",
                options.ellipsoid_opacity
            )?;
            for vertex in tri {
                let values = vertex.iter().copied().chain(point[3..].iter().copied());
                write_point(self.out, "", values)?;
            }
        }
        Ok(())
    }

    fn taxa(&mut self, taxa: &[Taxon], factors: &[f64]) -> io::Result<()> {
        let dims = self.dims;
        let color = &self.style.label_color.name;
        writeln!(self.out, "@group {{Taxa (n={})}} collapsible", taxa.len())?;

        for taxon in taxa {
            let radius = self.radius
                * (MAX_TAXON_RADIUS - MIN_TAXON_RADIUS).mul_add(taxon.prevalence, MIN_TAXON_RADIUS);
            let values: Vec<f64> = taxon
                .coords
                .iter()
                .zip(factors)
                .map(|(v, f)| v * f)
                .take(dims)
                .collect();

            writeln!(
                self.out,
                "@balllist color={color} radius={radius} alpha={TAXON_ALPHA} dimension={dims} master={{taxa_points}} nobutton"
            )?;
            write_point(self.out, taxon.label(), values.iter().copied())?;
            writeln!(
                self.out,
                "@labellist color={color} radius={radius} alpha={TAXON_ALPHA} dimension={dims} master={{taxa_labels}} nobutton"
            )?;
            write_point(self.out, taxon.label(), values)?;
        }
        Ok(())
    }

    fn trajectories(&mut self, trajectories: &[Trajectory]) -> io::Result<()> {
        let dims = self.dims;
        let line = &self.style.arrow_line_color.name;
        let head = &self.style.arrow_head_color.name;
        writeln!(self.out, "@group {{trajectories}} collapsible")?;

        let mut ends = Vec::new();
        for trajectory in trajectories {
            let indices: Vec<usize> = trajectory
                .sample_ids
                .iter()
                .filter_map(|id| self.sample_ids.iter().position(|s| s == id))
                .collect();
            if indices.len() < 2 {
                continue;
            }

            writeln!(
                self.out,
                "@vectorlist {{{}}} dimension={dims} color={line} on",
                trajectory.name
            )?;
            for &i in &indices {
                let values = self.row(i);
                write_point(self.out, &self.sample_ids[i], values)?;
            }
            ends.extend(indices.last().copied());
        }

        if !ends.is_empty() {
            writeln!(
                self.out,
                "@balllist color={head} radius={} alpha={POINT_ALPHA} dimension={dims} master={{points}} nobutton",
                self.radius
            )?;
            for i in ends {
                let values = self.row(i);
                write_point(self.out, &self.sample_ids[i], values)?;
            }
        }
        Ok(())
    }

    fn axes(&mut self) -> io::Result<()> {
        let dims = self.dims;
        let color = &self.style.label_color.name;
        let mins: Vec<f64> = (0..dims).map(|j| self.coords.column(j).min()).collect();
        let maxs: Vec<f64> = (0..dims).map(|j| self.coords.column(j).max()).collect();

        writeln!(self.out, "@group {{axes}} collapsible")?;
        for (j, label) in self.labels.iter().enumerate().take(dims) {
            let state = if j < VISIBLE_AXES { "on" } else { "off" };

            let mut end = mins.clone();
            end[j] = maxs[j];
            let mut label_at = mins.clone();
            label_at[j] = (maxs[j] - mins[j]).mul_add(AXIS_LABEL_OFFSET, mins[j]);

            writeln!(
                self.out,
                "@vectorlist {{{label}}} dimension={dims} color={color} {state}"
            )?;
            write_point(self.out, "", mins.iter().copied())?;
            write_point(self.out, "", end)?;
            writeln!(
                self.out,
                "@labellist {{{label}}} dimension={dims} color={color} {state}"
            )?;
            write_point(self.out, label, label_at)?;
        }
        Ok(())
    }
}

/// Write one `@kinemage` block for a category.
///
/// `scaled` multiplies each axis by its share of the largest percent
/// variation; bounds and taxa are scaled alike.
#[allow(clippy::too_many_arguments)]
pub fn write_mage_output<W: Write>(
    out: &mut W,
    data: &CoordData,
    name: &str,
    groups: &[ColorGroup],
    overlays: Overlays<'_>,
    style: &PlotStyle,
    options: &KinemageOptions,
    scaled: bool,
) -> io::Result<()> {
    let dims = data.dimensions().min(options.num_coords);
    let axis_pct = data.axis_pct();
    let factors: Vec<f64> = if scaled {
        let max = axis_pct.iter().copied().fold(0.0, f64::max);
        axis_pct
            .iter()
            .map(|p| if max > 0.0 { p / max } else { 1.0 })
            .collect()
    } else {
        vec![1.0; axis_pct.len()]
    };

    let coords = if scaled {
        scale_coords(&data.coords, &axis_pct)
    } else {
        data.coords.clone()
    };
    let bounds = data.bounds.as_ref().map(|b| {
        if scaled {
            (
                scale_coords(&b.low, &axis_pct),
                scale_coords(&b.high, &axis_pct),
            )
        } else {
            (b.low.clone(), b.high.clone())
        }
    });

    let mut builder = MageBuilder {
        out,
        sample_ids: &data.sample_ids,
        radius: auto_radius(&coords, style.ball_scale),
        coords,
        bounds,
        labels: data.axis_labels().into_iter().take(dims).collect(),
        dims,
        style,
    };

    let colors = used_colors(groups);
    builder.header(name, &colors, !overlays.taxa.is_empty())?;

    let mesh = unit_sphere(options.ellipsoid_smoothness);
    for group in groups {
        builder.group(group, options, &mesh)?;
    }
    if !overlays.taxa.is_empty() {
        builder.taxa(overlays.taxa, &factors)?;
    }
    if !overlays.trajectories.is_empty() {
        builder.trajectories(overlays.trajectories)?;
    }
    builder.axes()
}
