//! Kinplot - interactive 3D plots of principal coordinates.
//!
//! This crate turns PCoA coordinates and a sample mapping file into
//! kinemage files for the KiNG viewer or point files for inVUE, with
//! optional jackknife ellipsoids, biplots and trajectory statistics.

#![warn(missing_docs)]
#![allow(clippy::print_stdout)]

pub mod biplot;
pub mod cli;
pub mod colors;
pub mod config;
pub mod constants;
pub mod coords;
pub mod error;
pub mod output;
pub mod parse;
pub mod pipeline;
pub mod utils;
pub mod vectors;

use clap::Parser;
use cli::{Cli, Command, PlotArgs};
use config::{Config, config_file_path, load_default_config, save_default_config};
use coords::process_custom_axes;
use pipeline::{PlotOptions, generate_plots};
use tracing::info;

pub use error::{Error, Result};

/// Main entry point for kinplot CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.plot.verbose, cli.plot.quiet);

    // Handle subcommands; they must not depend on a loadable config file
    if let Some(command) = cli.command {
        return handle_command(command);
    }

    // Load configuration
    let config = load_default_config()?;

    // Show help if no inputs provided
    if cli.plot.coord_fname.is_none() && cli.plot.map_fname.is_none() {
        cli::help::print_smart_help(&config);
        return Ok(());
    }

    let options = build_plot_options(&cli.plot, &config)?;
    let result = generate_plots(&options)?;
    for path in &result.output_files {
        info!("  {}", path.display());
    }
    Ok(())
}

/// Merge command-line arguments with config defaults.
pub fn build_plot_options(args: &PlotArgs, config: &Config) -> Result<PlotOptions> {
    let defaults = &config.defaults;

    let coord_path = args
        .coord_fname
        .clone()
        .ok_or_else(|| Error::invalid_option("missing coordinates file (-i/--coord-fname)"))?;
    let map_path = args
        .map_fname
        .clone()
        .ok_or_else(|| Error::invalid_option("missing mapping file (-m/--map-fname)"))?;

    Ok(PlotOptions {
        coord_path,
        map_path,
        colorby: args.colorby.clone(),
        custom_axes: args
            .custom_axes
            .as_deref()
            .map(process_custom_axes)
            .unwrap_or_default(),
        prefs_path: args.prefs_path.clone(),
        background: args.background_color,
        config_background: defaults.background_color,
        ellipsoid_method: args.ellipsoid_method.unwrap_or(defaults.ellipsoid_method),
        ellipsoid_smoothness: args
            .ellipsoid_smoothness
            .unwrap_or(defaults.ellipsoid_smoothness),
        ellipsoid_opacity: args.ellipsoid_opacity.unwrap_or(defaults.ellipsoid_opacity),
        master_pcoa: args.master_pcoa.clone(),
        taxa_path: args.taxa_fname.clone(),
        n_taxa_keep: args.n_taxa_keep.unwrap_or(defaults.n_taxa_keep),
        biplot_output: args.biplot_output_file.clone(),
        output_format: args.output_format.unwrap_or(defaults.output_format),
        interpolation_points: args.interpolation_points,
        polyhedron_points: args.polyhedron_points,
        polyhedron_offset: args.polyhedron_offset,
        add_vectors: args.add_vectors.clone(),
        rms_algorithm: args.rms_algorithm,
        rms_path: args.rms_path.clone(),
        output_dir: args.output_dir.clone(),
        king_jar: args.king_jar.clone().or_else(|| config.support.king_jar.clone()),
        num_coords: defaults.num_coords,
        scaled: defaults.scaled,
        unscaled: defaults.unscaled,
        progress_enabled: !args.quiet && !args.no_progress,
    })
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  Set [support] king_jar to the path of your king.jar");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::{BackgroundColor, EllipsoidMethod, OutputFormat};
    use std::path::PathBuf;

    #[test]
    fn test_build_plot_options_uses_config_defaults() {
        let cli = Cli::try_parse_from(["kinplot", "-i", "pcoa.txt", "-m", "map.txt"]).unwrap();
        let mut config = Config::default();
        config.defaults.ellipsoid_method = EllipsoidMethod::Sdev;
        config.defaults.background_color = Some(BackgroundColor::White);
        config.defaults.output_format = OutputFormat::Invue;
        config.support.king_jar = Some(PathBuf::from("/opt/king.jar"));

        let options = build_plot_options(&cli.plot, &config).unwrap();
        assert_eq!(options.ellipsoid_method, EllipsoidMethod::Sdev);
        assert_eq!(options.background, None);
        assert_eq!(options.config_background, Some(BackgroundColor::White));
        assert_eq!(options.output_format, OutputFormat::Invue);
        assert_eq!(options.king_jar, Some(PathBuf::from("/opt/king.jar")));
        assert_eq!(options.n_taxa_keep, 10);
    }

    #[test]
    fn test_build_plot_options_cli_overrides() {
        let cli = Cli::try_parse_from([
            "kinplot",
            "-i",
            "pcoa.txt",
            "-m",
            "map.txt",
            "-a",
            "pH, 'Temp'",
            "--ellipsoid-opacity",
            "0.8",
            "--king-jar",
            "king.jar",
            "-q",
        ])
        .unwrap();
        let mut config = Config::default();
        config.support.king_jar = Some(PathBuf::from("/opt/king.jar"));

        let options = build_plot_options(&cli.plot, &config).unwrap();
        assert_eq!(options.custom_axes, vec!["pH", "Temp"]);
        assert_eq!(options.ellipsoid_opacity, 0.8);
        assert_eq!(options.king_jar, Some(PathBuf::from("king.jar")));
        assert!(!options.progress_enabled);
    }

    #[test]
    fn test_build_plot_options_requires_mapping() {
        let cli = Cli::try_parse_from(["kinplot", "-i", "pcoa.txt"]).unwrap();
        assert!(matches!(
            build_plot_options(&cli.plot, &Config::default()),
            Err(Error::InvalidOption { .. })
        ));
    }
}
