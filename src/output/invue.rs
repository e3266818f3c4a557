//! Point files for the inVUE viewer.
//!
//! All files are tab-separated with a `#SampleID` header and use the first
//! three axes.

use super::write_output_file;
use crate::colors::ColorGroup;
use crate::constants::invue::{ALL_SAMPLES, POLYHEDRON};
use crate::coords::CoordData;
use crate::error::Result;
use std::collections::HashSet;
use std::f64::consts::PI;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Settings for the inVUE output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvueOptions {
    /// Points interpolated between successive samples of a group.
    pub interpolation_points: usize,
    /// Number of polyhedron frame points.
    pub polyhedron_points: usize,
    /// Polyhedron radius as a multiple of the largest sample distance.
    pub polyhedron_offset: f64,
}

fn point3(data: &CoordData, idx: usize) -> [f64; 3] {
    [
        data.coords[(idx, 0)],
        data.coords[(idx, 1)],
        data.coords[(idx, 2)],
    ]
}

/// Make a category value safe for use in a file name.
fn file_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Points strictly between `a` and `b`, evenly spaced.
pub fn interpolate(a: [f64; 3], b: [f64; 3], n: usize) -> Vec<[f64; 3]> {
    (1..=n)
        .map(|k| {
            let t = k as f64 / (n + 1) as f64;
            [
                (b[0] - a[0]).mul_add(t, a[0]),
                (b[1] - a[1]).mul_add(t, a[1]),
                (b[2] - a[2]).mul_add(t, a[2]),
            ]
        })
        .collect()
}

/// `n` points spread evenly over a sphere (Fibonacci lattice).
pub fn sphere_points(center: [f64; 3], radius: f64, n: usize) -> Vec<[f64; 3]> {
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
            let ring = (1.0 - y * y).sqrt();
            let theta = golden_angle * i as f64;
            [
                (ring * theta.cos()).mul_add(radius, center[0]),
                y.mul_add(radius, center[1]),
                (ring * theta.sin()).mul_add(radius, center[2]),
            ]
        })
        .collect()
}

/// Write `<name>_All_samples.txt`.
pub fn write_all_samples(dir: &Path, name: &str, data: &CoordData) -> Result<PathBuf> {
    let path = dir.join(format!("{name}_{ALL_SAMPLES}.txt"));
    write_output_file(&path, |writer| {
        writeln!(writer, "#SampleID\tX\tY\tZ")?;
        for (i, id) in data.sample_ids.iter().enumerate() {
            let [x, y, z] = point3(data, i);
            writeln!(writer, "{id}\t{x}\t{y}\t{z}")?;
        }
        Ok(())
    })?;
    Ok(path)
}

/// Write `<name>_<category>_<value>.txt` for every group.
///
/// Values that reduce to an already used file name get the group's index
/// appended (`<value>_<i>`).
pub fn write_group_files(
    dir: &Path,
    name: &str,
    category: &str,
    groups: &[ColorGroup],
    data: &CoordData,
    interpolation_points: usize,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(groups.len());
    let mut used = HashSet::new();
    let prefix = format!("{name}_{}", file_component(category));

    for (index, group) in groups.iter().enumerate() {
        let mut stem = format!("{prefix}_{}", file_component(&group.value));
        while !used.insert(stem.clone()) {
            stem = format!("{stem}_{index}");
        }
        let path = dir.join(format!("{stem}.txt"));
        let (r, g, b) = group.color.hsv.to_rgb();
        let members: Vec<(&str, [f64; 3])> = group
            .sample_ids
            .iter()
            .filter_map(|id| data.index_of(id).map(|i| (id.as_str(), point3(data, i))))
            .collect();

        write_output_file(&path, |writer| {
            writeln!(writer, "#SampleID\tX\tY\tZ\tR\tG\tB")?;
            for (k, (id, p)) in members.iter().enumerate() {
                writeln!(writer, "{id}\t{}\t{}\t{}\t{r}\t{g}\t{b}", p[0], p[1], p[2])?;
                if let Some((next_id, next)) = members.get(k + 1) {
                    let between = interpolate(*p, *next, interpolation_points);
                    for (step, q) in between.iter().enumerate() {
                        writeln!(
                            writer,
                            "{id}-{next_id}.{}\t{}\t{}\t{}\t{r}\t{g}\t{b}",
                            step + 1,
                            q[0],
                            q[1],
                            q[2]
                        )?;
                    }
                }
            }
            Ok(())
        })?;
        paths.push(path);
    }

    Ok(paths)
}

/// Write `<name>_polyhedron.txt`, a frame of points enclosing every sample.
pub fn write_polyhedron(
    dir: &Path,
    name: &str,
    data: &CoordData,
    options: &InvueOptions,
) -> Result<PathBuf> {
    let n = data.len().max(1) as f64;
    let mut centroid = [0.0; 3];
    for i in 0..data.len() {
        for (acc, v) in centroid.iter_mut().zip(point3(data, i)) {
            *acc += v / n;
        }
    }
    let max_distance = (0..data.len())
        .map(|i| {
            let p = point3(data, i);
            p.iter()
                .zip(&centroid)
                .map(|(a, c)| (a - c).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .fold(0.0, f64::max);

    let path = dir.join(format!("{name}_{POLYHEDRON}.txt"));
    let points = sphere_points(
        centroid,
        max_distance * options.polyhedron_offset,
        options.polyhedron_points,
    );
    write_output_file(&path, |writer| {
        writeln!(writer, "#SampleID\tX\tY\tZ")?;
        for (i, p) in points.iter().enumerate() {
            writeln!(writer, "{POLYHEDRON}_{}\t{}\t{}\t{}", i + 1, p[0], p[1], p[2])?;
        }
        Ok(())
    })?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::colors::lookup;
    use nalgebra::DMatrix;
    use tempfile::TempDir;

    fn data() -> CoordData {
        CoordData {
            sample_ids: vec!["S1".into(), "S2".into()],
            coords: DMatrix::from_row_slice(2, 4, &[0.0, 0.0, 0.0, 9.0, 3.0, 3.0, 3.0, 9.0]),
            eigvals: vec![1.0; 4],
            pct_var: vec![40.0, 30.0, 20.0, 10.0],
            bounds: None,
            custom_axes: Vec::new(),
        }
    }

    #[test]
    fn test_interpolate() {
        let points = interpolate([0.0; 3], [2.0, 4.0, -2.0], 1);
        assert_eq!(points, vec![[1.0, 2.0, -1.0]]);
        assert_eq!(interpolate([0.0; 3], [4.0; 3], 3).len(), 3);
        assert!(interpolate([0.0; 3], [1.0; 3], 0).is_empty());
    }

    #[test]
    fn test_sphere_points_on_radius() {
        let points = sphere_points([1.0, 2.0, 3.0], 2.0, 6);
        assert_eq!(points.len(), 6);
        for p in points {
            let d = ((p[0] - 1.0).powi(2) + (p[1] - 2.0).powi(2) + (p[2] - 3.0).powi(2)).sqrt();
            assert!((d - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_all_samples_file() {
        let dir = TempDir::new().unwrap();
        let path = write_all_samples(dir.path(), "pcoa", &data()).unwrap();
        assert_eq!(path.file_name().unwrap(), "pcoa_All_samples.txt");
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents, "#SampleID\tX\tY\tZ\nS1\t0\t0\t0\nS2\t3\t3\t3\n");
    }

    #[test]
    fn test_group_files_with_interpolation() {
        let dir = TempDir::new().unwrap();
        let groups = vec![ColorGroup {
            value: "Control group".into(),
            sample_ids: vec!["S1".into(), "S2".into()],
            color: lookup("red1").unwrap(),
        }];
        let paths =
            write_group_files(dir.path(), "pcoa", "Treatment", &groups, &data(), 1).unwrap();
        assert_eq!(paths[0].file_name().unwrap(), "pcoa_Treatment_Control_group.txt");

        let contents = std::fs::read_to_string(&paths[0]).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "S1\t0\t0\t0\t255\t0\t0");
        assert_eq!(lines[2], "S1-S2.1\t1.5\t1.5\t1.5\t255\t0\t0");
        assert_eq!(lines[3], "S2\t3\t3\t3\t255\t0\t0");
    }

    #[test]
    fn test_group_files_with_colliding_names() {
        let dir = TempDir::new().unwrap();
        let group = |value: &str, id: &str| ColorGroup {
            value: value.into(),
            sample_ids: vec![id.into()],
            color: lookup("red1").unwrap(),
        };
        let groups = vec![group("a b", "S1"), group("a_b", "S2")];
        let paths =
            write_group_files(dir.path(), "pcoa", "Site", &groups, &data(), 0).unwrap();

        assert_eq!(paths[0].file_name().unwrap(), "pcoa_Site_a_b.txt");
        assert_eq!(paths[1].file_name().unwrap(), "pcoa_Site_a_b_1.txt");
        let first = std::fs::read_to_string(&paths[0]).unwrap();
        let second = std::fs::read_to_string(&paths[1]).unwrap();
        assert!(first.contains("S1\t"));
        assert!(second.contains("S2\t"));
    }

    #[test]
    fn test_polyhedron_file() {
        let dir = TempDir::new().unwrap();
        let options = InvueOptions {
            interpolation_points: 0,
            polyhedron_points: 4,
            polyhedron_offset: 1.5,
        };
        let path = write_polyhedron(dir.path(), "pcoa", &data(), &options).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 5);
        assert!(contents.contains("polyhedron_4\t"));
    }
}
