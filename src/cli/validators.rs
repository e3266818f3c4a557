//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

use crate::constants::{RMS_PATH_VALID_CHARS, invue::MIN_POLYHEDRON_POINTS};

/// Parse and validate a bounded float value.
///
/// # Arguments
///
/// * `s` - The string to parse
/// * `min` - Minimum allowed value (inclusive)
/// * `max` - Maximum allowed value (inclusive)
/// * `name` - Name of the parameter for error messages
pub fn parse_bounded_float(s: &str, min: f64, max: f64, name: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(min..=max).contains(&value) {
        return Err(format!(
            "{name} must be between {min} and {max}, got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate ellipsoid opacity (0.0-1.0).
pub fn parse_opacity(s: &str) -> Result<f64, String> {
    parse_bounded_float(s, 0.0, 1.0, "ellipsoid opacity")
}

/// Validate an RMS output file name.
pub fn parse_rms_path(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("RMS output file name must not be empty".to_string());
    }
    if let Some(bad) = s.chars().find(|c| !RMS_PATH_VALID_CHARS.contains(*c)) {
        return Err(format!(
            "RMS output file name may only contain letters, digits, '_' and '.', found '{bad}'"
        ));
    }
    Ok(s.to_string())
}

/// Parse and validate the number of polyhedron points.
pub fn parse_polyhedron_points(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid count"))?;

    if value < MIN_POLYHEDRON_POINTS {
        return Err(format!(
            "polyhedron points must be at least {MIN_POLYHEDRON_POINTS}, got {value}"
        ));
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounded_float() {
        assert_eq!(parse_bounded_float("0.5", 0.0, 1.0, "x").ok(), Some(0.5));
        assert!(parse_bounded_float("2", 0.0, 1.0, "x").is_err());
        assert!(parse_bounded_float("abc", 0.0, 1.0, "x").is_err());
    }

    #[test]
    fn test_parse_opacity() {
        assert_eq!(parse_opacity("0").ok(), Some(0.0));
        assert_eq!(parse_opacity("1.0").ok(), Some(1.0));
        let err = parse_opacity("-0.1").unwrap_err();
        assert!(err.contains("ellipsoid opacity"));
    }

    #[test]
    fn test_parse_rms_path() {
        assert_eq!(parse_rms_path("RMS_out.txt").ok().as_deref(), Some("RMS_out.txt"));
        assert!(parse_rms_path("rms-out.txt").is_err());
        assert!(parse_rms_path("dir/rms.txt").is_err());
        assert!(parse_rms_path("rms out.txt").is_err());
        assert!(parse_rms_path("").is_err());
    }

    #[test]
    fn test_parse_polyhedron_points() {
        assert_eq!(parse_polyhedron_points("4").ok(), Some(4));
        assert_eq!(parse_polyhedron_points("20").ok(), Some(20));
        assert!(parse_polyhedron_points("3").is_err());
        assert!(parse_polyhedron_points("-1").is_err());
    }
}
