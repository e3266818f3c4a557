//! CLI argument parsing and command handling.

mod args;
pub mod help;
pub mod validators;

pub use args::{Cli, Command, ConfigAction, PlotArgs};
