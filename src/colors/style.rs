//! Plot-wide style resolved from the CLI, prefs, and config.

use super::palette::{NamedColor, lookup};
use super::prefs::Prefs;
use crate::config::BackgroundColor;
use crate::constants::prefs as defaults;
use crate::error::{Error, Result};

/// Colors and sizes shared by every kinemage of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    /// Plot background.
    pub background: BackgroundColor,
    /// Color of labels and axes.
    pub label_color: NamedColor,
    /// Multiplier for the automatic ball radius.
    pub ball_scale: f64,
    /// Color of trajectory lines.
    pub arrow_line_color: NamedColor,
    /// Color of trajectory end markers.
    pub arrow_head_color: NamedColor,
}

fn named(name: &str) -> Result<NamedColor> {
    lookup(name).ok_or_else(|| Error::UnknownColor {
        name: name.to_string(),
    })
}

impl PlotStyle {
    /// Resolve the style. The background comes from the CLI, then prefs,
    /// then config, then black.
    pub fn resolve(
        cli_background: Option<BackgroundColor>,
        prefs: &Prefs,
        config_background: Option<BackgroundColor>,
    ) -> Result<Self> {
        let background = cli_background
            .or(prefs.background_color)
            .or(config_background)
            .unwrap_or_default();

        let default_label = match background {
            BackgroundColor::White => "black",
            BackgroundColor::Black => defaults::LABEL_COLOR,
        };

        Ok(Self {
            background,
            label_color: named(prefs.label_color.as_deref().unwrap_or(default_label))?,
            ball_scale: prefs.ball_scale.unwrap_or(defaults::BALL_SCALE),
            arrow_line_color: named(
                prefs
                    .arrow_line_color
                    .as_deref()
                    .unwrap_or(defaults::ARROW_LINE_COLOR),
            )?,
            arrow_head_color: named(
                prefs
                    .arrow_head_color
                    .as_deref()
                    .unwrap_or(defaults::ARROW_HEAD_COLOR),
            )?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let style = PlotStyle::resolve(None, &Prefs::default(), None).unwrap();
        assert_eq!(style.background, BackgroundColor::Black);
        assert_eq!(style.label_color.name, "white");
        assert_eq!(style.ball_scale, 1.0);
        assert_eq!(style.arrow_head_color.name, "red1");
    }

    #[test]
    fn test_background_precedence() {
        let prefs = Prefs {
            background_color: Some(BackgroundColor::White),
            ..Prefs::default()
        };
        let config = Some(BackgroundColor::Black);

        let style = PlotStyle::resolve(None, &prefs, config).unwrap();
        assert_eq!(style.background, BackgroundColor::White);
        assert_eq!(style.label_color.name, "black");

        let style = PlotStyle::resolve(None, &Prefs::default(), Some(BackgroundColor::White)).unwrap();
        assert_eq!(style.background, BackgroundColor::White);

        let style = PlotStyle::resolve(Some(BackgroundColor::Black), &prefs, config).unwrap();
        assert_eq!(style.background, BackgroundColor::Black);
    }

    #[test]
    fn test_unknown_label_color() {
        let prefs = Prefs {
            label_color: Some("mauve".into()),
            ..Prefs::default()
        };
        assert!(PlotStyle::resolve(None, &prefs, None).is_err());
    }
}
