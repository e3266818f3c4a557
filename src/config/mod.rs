//! Configuration loading and management.

mod file;
mod paths;
mod types;
mod validate;

pub use file::{load_config_file, load_default_config, save_config, save_default_config};
pub use paths::{config_dir, config_file_path};
pub use types::{
    BackgroundColor, Config, DefaultsConfig, EllipsoidMethod, OutputFormat, RmsAlgorithm,
    SupportConfig,
};
pub use validate::{validate_config, validate_ellipsoid_opacity, validate_ellipsoid_smoothness};
