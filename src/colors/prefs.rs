//! User preferences file.
//!
//! A TOML (or JSON, by `.json` extension) document such as:
//!
//! ```toml
//! background_color = "white"
//! label_color = "black"
//! ball_scale = 1.5
//!
//! [sample_coloring.Treatment]
//! column = "Treatment"
//! colors = { Control = "blue1", Fast = [0, 100, 100] }
//!
//! [sample_coloring.DOB]
//! column = "DOB"
//! gradient = { start = "red1", end = "blue1" }
//! ```

use super::palette::{HsvColor, NamedColor, lookup};
use crate::config::BackgroundColor;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed preferences file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Prefs {
    /// Plot background.
    pub background_color: Option<BackgroundColor>,
    /// Color of labels and axes.
    pub label_color: Option<String>,
    /// Multiplier for the automatic ball radius.
    pub ball_scale: Option<f64>,
    /// Color of trajectory lines.
    pub arrow_line_color: Option<String>,
    /// Color of trajectory end markers.
    pub arrow_head_color: Option<String>,
    /// Per-category coloring, keyed by category label.
    pub sample_coloring: BTreeMap<String, ColoringPref>,
}

/// Coloring for one metadata category.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ColoringPref {
    /// Mapping column (may combine columns with `&&`).
    pub column: String,
    /// Explicit colors by column value.
    #[serde(default)]
    pub colors: BTreeMap<String, ColorSpec>,
    /// Gradient applied to values without an explicit color.
    #[serde(default)]
    pub gradient: Option<Gradient>,
}

/// Start and end of a color gradient.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Gradient {
    /// Color of the lowest value.
    pub start: ColorSpec,
    /// Color of the highest value.
    pub end: ColorSpec,
}

/// A palette name or an explicit HSV triple.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Palette color name.
    Name(String),
    /// Hue, saturation, value.
    Hsv([f64; 3]),
}

impl ColorSpec {
    /// Resolve to a color value.
    pub fn hsv(&self) -> Result<HsvColor> {
        match self {
            Self::Name(name) => lookup(name)
                .map(|c| c.hsv)
                .ok_or_else(|| Error::UnknownColor { name: name.clone() }),
            Self::Hsv([h, s, v]) => Ok(HsvColor::new(*h, *s, *v)),
        }
    }

    /// Resolve to a named color; explicit triples are named `fallback_name`.
    pub fn named(&self, fallback_name: &str) -> Result<NamedColor> {
        match self {
            Self::Name(name) => {
                lookup(name).ok_or_else(|| Error::UnknownColor { name: name.clone() })
            }
            Self::Hsv(_) => Ok(NamedColor::new(fallback_name, self.hsv()?)),
        }
    }
}

/// Load a preferences file, choosing the format by extension.
pub fn load_prefs(path: &Path) -> Result<Prefs> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::InputRead {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let prefs: Prefs = if is_json {
        serde_json::from_str(&contents).map_err(|e| Error::PrefsParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        toml::from_str(&contents).map_err(|e| Error::PrefsParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    if let Some(scale) = prefs.ball_scale
        && !(scale.is_finite() && scale > 0.0)
    {
        return Err(Error::PrefsParse {
            path: path.to_path_buf(),
            message: format!("ball_scale must be positive, got {scale}"),
        });
    }

    Ok(prefs)
}
