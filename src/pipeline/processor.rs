//! Plot generation for each output format.

use crate::biplot::{load_biplot_taxa, write_biplot_scores};
use crate::colors::{
    ColorCategory, ColorGroup, PlotStyle, Prefs, assign_colors, load_prefs, process_colorby,
};
use crate::config::OutputFormat;
use crate::constants::MIN_PLOT_DIMENSIONS;
use crate::constants::kinemage::{EXTENSION, HTML_SUFFIX};
use crate::coords::{CoordData, apply_custom_axes, get_coord};
use crate::error::{Error, Result};
use crate::output::{
    InvueOptions, KinemageOptions, Overlays, create_output_dir, kinemage_page, progress,
    write_all_samples, write_group_files, write_mage_output, write_output_file, write_polyhedron,
};
use crate::parse::{MappingTable, parse_mapping_file};
use crate::pipeline::{PlotOptions, copy_king_jar, create_data_dir, plot_name, validate_options};
use crate::vectors::{VectorColumns, make_trajectories, rms_output_path, run_rms};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Summary of a plotting run.
#[derive(Debug, Clone, Default)]
pub struct PlotResult {
    /// Files written, in order.
    pub output_files: Vec<PathBuf>,
    /// Samples plotted.
    pub samples: usize,
    /// Categories colored.
    pub categories: usize,
    /// Wall time in seconds.
    pub elapsed_secs: f64,
}

/// Inputs shared by both output formats.
struct PreparedPlot {
    mapping: MappingTable,
    data: CoordData,
    prefs: Prefs,
    categories: Vec<ColorCategory>,
}

fn check_dimensions(data: &CoordData) -> Result<()> {
    if data.dimensions() < MIN_PLOT_DIMENSIONS {
        return Err(Error::TooFewDimensions {
            required: MIN_PLOT_DIMENSIONS,
            found: data.dimensions(),
        });
    }
    Ok(())
}

fn prepare(options: &PlotOptions) -> Result<PreparedPlot> {
    let mut mapping = parse_mapping_file(&options.map_path)?;
    let prefs = options
        .prefs_path
        .as_deref()
        .map(load_prefs)
        .transpose()?
        .unwrap_or_default();

    let mut data = get_coord(
        &options.coord_path,
        options.ellipsoid_method,
        options.master_pcoa.as_deref(),
        options.progress_enabled,
    )?;
    data.remove_unmapped_samples(&mapping)?;
    check_dimensions(&data)?;

    let categories = process_colorby(options.colorby.as_deref(), &prefs, &mut mapping)?;
    info!(
        "Plotting {} samples on {} axes, {} categories",
        data.len(),
        data.dimensions(),
        categories.len()
    );

    Ok(PreparedPlot {
        mapping,
        data,
        prefs,
        categories,
    })
}

/// Color every category, keeping only plotted samples.
fn color_categories<'a>(
    categories: &'a [ColorCategory],
    mapping: &MappingTable,
    data: &CoordData,
) -> Result<Vec<(&'a ColorCategory, Vec<ColorGroup>)>> {
    let plotted: HashSet<&str> = data.sample_ids.iter().map(String::as_str).collect();
    categories
        .iter()
        .map(|category| {
            let groups = assign_colors(category, mapping, |id| plotted.contains(id))?;
            debug!("{}: {} groups", category.key, groups.len());
            Ok((category, groups))
        })
        .collect()
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    write_output_file(path, |writer| writer.write_all(contents.as_bytes()))
}

/// Validate the options and write plots in the requested format.
pub fn generate_plots(options: &PlotOptions) -> Result<PlotResult> {
    let start_time = Instant::now();
    validate_options(options)?;

    let mut result = match options.output_format {
        OutputFormat::King => generate_king_plots(options)?,
        OutputFormat::Invue => generate_invue_plots(options)?,
    };

    result.elapsed_secs = start_time.elapsed().as_secs_f64();
    info!(
        "Wrote {} files to {} in {:.2}s",
        result.output_files.len(),
        options.output_dir.display(),
        result.elapsed_secs
    );
    Ok(result)
}

/// Write the kinemage, its HTML page, and the optional biplot and RMS files.
pub fn generate_king_plots(options: &PlotOptions) -> Result<PlotResult> {
    let PreparedPlot {
        mapping,
        mut data,
        prefs,
        categories,
    } = prepare(options)?;

    if !options.custom_axes.is_empty() {
        apply_custom_axes(&mut data, &options.custom_axes, &mapping)?;
        check_dimensions(&data)?;
    }
    let style = PlotStyle::resolve(options.background, &prefs, options.config_background)?;

    let plotted: HashSet<&str> = data.sample_ids.iter().map(String::as_str).collect();
    let vector_columns = options
        .add_vectors
        .as_deref()
        .map(|spec| VectorColumns::parse(spec, &mapping))
        .transpose()?;
    let trajectories = match &vector_columns {
        Some(columns) => make_trajectories(columns, &mapping, |id| plotted.contains(id))?,
        None => Vec::new(),
    };

    let taxa = match &options.taxa_path {
        Some(path) => load_biplot_taxa(path, &data, options.n_taxa_keep)?,
        None => Vec::new(),
    };

    let colored = color_categories(&categories, &mapping, &data)?;

    create_output_dir(&options.output_dir)?;
    let mut output_files = Vec::new();

    if let Some(path) = &options.biplot_output {
        write_biplot_scores(path, &taxa)?;
        output_files.push(path.clone());
    }

    if let (Some(columns), Some(algorithm)) = (&vector_columns, options.rms_algorithm) {
        let path = rms_output_path(&options.output_dir, &options.rms_path);
        run_rms(&data, &trajectories, &columns.group, algorithm, &path)?;
        output_files.push(path);
    }

    let name = plot_name(&options.coord_path)?;
    let data_dir = create_data_dir(&options.output_dir, &name)?;
    if let Some(jar) = copy_king_jar(options.king_jar.as_deref(), &options.output_dir)? {
        output_files.push(jar);
    }

    let kin_options = KinemageOptions {
        num_coords: options.num_coords,
        ellipsoid_smoothness: options.ellipsoid_smoothness,
        ellipsoid_opacity: options.ellipsoid_opacity,
    };
    let overlays = Overlays {
        taxa: &taxa,
        trajectories: &trajectories,
    };
    let variants = [(options.scaled, true, "scaled"), (options.unscaled, false, "unscaled")];

    let kin_name = format!("{name}.{EXTENSION}");
    let kin_path = data_dir.join(&kin_name);
    let pb = progress::create_category_progress(colored.len(), options.progress_enabled);
    write_output_file(&kin_path, |writer| {
        for (category, groups) in &colored {
            progress::set_progress_message(pb.as_ref(), &category.key);
            for (enabled, scaled, suffix) in variants {
                if !enabled {
                    continue;
                }
                write_mage_output(
                    writer,
                    &data,
                    &format!("{}_{suffix}", category.key),
                    groups,
                    overlays,
                    &style,
                    &kin_options,
                    scaled,
                )?;
            }
            progress::inc_progress(pb.as_ref());
        }
        Ok(())
    })?;
    progress::finish_progress(pb, "Done");
    debug!("Wrote {}", kin_path.display());
    output_files.push(kin_path);

    let data_dir_name = data_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let html_path = options.output_dir.join(format!("{name}{HTML_SUFFIX}"));
    write_text(
        &html_path,
        &kinemage_page(&name, &format!("{data_dir_name}/{kin_name}")),
    )?;
    output_files.push(html_path);

    Ok(PlotResult {
        output_files,
        samples: data.len(),
        categories: colored.len(),
        elapsed_secs: 0.0,
    })
}

/// Write the inVUE point files.
pub fn generate_invue_plots(options: &PlotOptions) -> Result<PlotResult> {
    let PreparedPlot {
        mapping,
        data,
        categories,
        ..
    } = prepare(options)?;

    let invue_options = InvueOptions {
        interpolation_points: usize::try_from(options.interpolation_points).map_err(|_| {
            Error::invalid_option(format!(
                "interpolation points must be 0 or more, got {}",
                options.interpolation_points
            ))
        })?,
        polyhedron_points: options.polyhedron_points,
        polyhedron_offset: options.polyhedron_offset,
    };
    let colored = color_categories(&categories, &mapping, &data)?;

    create_output_dir(&options.output_dir)?;
    let dir = options.output_dir.as_path();
    let name = plot_name(&options.coord_path)?;

    let mut output_files = vec![write_all_samples(dir, &name, &data)?];
    for (category, groups) in &colored {
        output_files.extend(write_group_files(
            dir,
            &name,
            &category.key,
            groups,
            &data,
            invue_options.interpolation_points,
        )?);
    }
    output_files.push(write_polyhedron(dir, &name, &data, &invue_options)?);

    Ok(PlotResult {
        output_files,
        samples: data.len(),
        categories: colored.len(),
        elapsed_secs: 0.0,
    })
}
