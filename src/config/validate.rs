//! Configuration validation.

use crate::config::Config;
use crate::constants::{MIN_PLOT_DIMENSIONS, ellipsoid};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    validate_ellipsoid_smoothness(defaults.ellipsoid_smoothness)
        .map_err(|message| Error::ConfigValidation { message })?;
    validate_ellipsoid_opacity(defaults.ellipsoid_opacity)
        .map_err(|message| Error::ConfigValidation { message })?;

    if defaults.num_coords < MIN_PLOT_DIMENSIONS {
        return Err(Error::ConfigValidation {
            message: format!(
                "num_coords must be at least {MIN_PLOT_DIMENSIONS}, got {}",
                defaults.num_coords
            ),
        });
    }

    if !defaults.scaled && !defaults.unscaled {
        return Err(Error::ConfigValidation {
            message: "at least one of scaled or unscaled must be enabled".to_string(),
        });
    }

    if let Some(jar) = &config.support.king_jar
        && !jar.is_file()
    {
        tracing::warn!("Configured king_jar does not exist: {}", jar.display());
    }

    Ok(())
}

/// Check that an ellipsoid smoothness is between 0 and 3.
pub fn validate_ellipsoid_smoothness(value: u8) -> std::result::Result<u8, String> {
    if value > ellipsoid::MAX_SMOOTHNESS {
        return Err(format!(
            "ellipsoid smoothness must be between 0 and {}, got {value}",
            ellipsoid::MAX_SMOOTHNESS
        ));
    }
    Ok(value)
}

/// Check that an ellipsoid opacity is between 0 and 1.
pub fn validate_ellipsoid_opacity(value: f64) -> std::result::Result<f64, String> {
    if !(0.0..=1.0).contains(&value) {
        return Err(format!(
            "ellipsoid opacity must be between 0 and 1, got {value}"
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_smoothness() {
        let mut config = Config::default();
        config.defaults.ellipsoid_smoothness = 4;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_opacity() {
        let mut config = Config::default();
        config.defaults.ellipsoid_opacity = 1.5;
        assert!(validate_config(&config).is_err());
        config.defaults.ellipsoid_opacity = -0.1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_too_few_coords() {
        let mut config = Config::default();
        config.defaults.num_coords = 2;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_needs_a_variant() {
        let mut config = Config::default();
        config.defaults.scaled = false;
        config.defaults.unscaled = false;
        assert!(validate_config(&config).is_err());
    }
}
