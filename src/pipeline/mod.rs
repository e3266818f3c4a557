//! Plotting pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{
    PlotOptions, copy_king_jar, create_data_dir, plot_name, validate_options,
};
pub use processor::{PlotResult, generate_invue_plots, generate_king_plots, generate_plots};
