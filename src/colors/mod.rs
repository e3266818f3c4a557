//! Sample coloring.
//!
//! Resolves which metadata categories to color by, assigns a named
//! kinemage color to each group, and loads the preferences file.

mod groups;
mod palette;
mod prefs;
mod style;

pub use groups::{ColorCategory, ColorGroup, assign_colors, process_colorby, used_colors};
pub use palette::{DATA_COLORS, HsvColor, NamedColor, lookup};
pub use prefs::{ColorSpec, ColoringPref, Gradient, Prefs, load_prefs};
pub use style::PlotStyle;
