//! Coordinate parsing and range validation for request parameters.

use thiserror::Error;

/// Errors produced when parsing or validating a coordinate parameter.
#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    /// The parameter was absent or empty.
    #[error("coordinate parameter is missing")]
    Missing,

    /// The parameter could not be parsed as a finite number.
    #[error("coordinate is not numeric: {0}")]
    NotNumeric(String),

    /// The parsed value falls outside the valid latitude/longitude range.
    #[error("coordinate out of range: lat={lat}, lng={lng}")]
    OutOfRange { lat: f64, lng: f64 },
}

/// Parse a raw query parameter into a finite coordinate value.
pub fn parse_coordinate(raw: &str) -> Result<f64, CoordinateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoordinateError::Missing);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CoordinateError::NotNumeric(trimmed.to_string())),
    }
}

/// Check a latitude/longitude pair against the valid ranges (inclusive).
pub fn validate_range(lat: f64, lng: f64) -> Result<(), CoordinateError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
        Ok(())
    } else {
        Err(CoordinateError::OutOfRange { lat, lng })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse_coordinate("40.7128").unwrap(), 40.7128);
        assert_eq!(parse_coordinate(" -74.0060 ").unwrap(), -74.0060);
        assert_eq!(parse_coordinate("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_missing() {
        assert_eq!(parse_coordinate(""), Err(CoordinateError::Missing));
        assert_eq!(parse_coordinate("   "), Err(CoordinateError::Missing));
    }

    #[test]
    fn test_parse_not_numeric() {
        assert!(matches!(
            parse_coordinate("north"),
            Err(CoordinateError::NotNumeric(_))
        ));
        assert!(matches!(
            parse_coordinate("12.3.4"),
            Err(CoordinateError::NotNumeric(_))
        ));
        // NaN and infinities are not usable coordinates
        assert!(matches!(
            parse_coordinate("NaN"),
            Err(CoordinateError::NotNumeric(_))
        ));
        assert!(matches!(
            parse_coordinate("inf"),
            Err(CoordinateError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_range_boundaries_inclusive() {
        assert!(validate_range(90.0, 0.0).is_ok());
        assert!(validate_range(-90.0, 0.0).is_ok());
        assert!(validate_range(0.0, 180.0).is_ok());
        assert!(validate_range(0.0, -180.0).is_ok());
    }

    #[test]
    fn test_range_just_beyond_rejected() {
        assert!(validate_range(90.0000001, 0.0).is_err());
        assert!(validate_range(-90.0000001, 0.0).is_err());
        assert!(validate_range(0.0, 180.0000001).is_err());
        assert!(validate_range(0.0, -180.0000001).is_err());
    }
}
