//! Field-level validation shared by the entity constructors.

use crate::error::ValidationError;

/// Reject empty or whitespace-only text, returning it trimmed.
pub(crate) fn non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}

/// Reject negative, NaN and infinite values.
pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotNonNegative { field, value })
    }
}

pub(crate) fn optional_non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<f64>, ValidationError> {
    value.map(|v| non_negative(field, v)).transpose()
}

pub(crate) fn in_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

/// Normalize a hex color to six uppercase digits, dropping a leading `#`.
pub(crate) fn color(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(digits.to_ascii_uppercase())
    } else {
        Err(ValidationError::InvalidColor(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("007AFF", "007AFF")]
    #[case("#ff9500", "FF9500")]
    #[case("  34c759 ", "34C759")]
    fn color_accepts(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(color(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("#12345")]
    #[case("GGGGGG")]
    #[case("1234567")]
    fn color_rejects(#[case] input: &str) {
        assert!(matches!(color(input), Err(ValidationError::InvalidColor(_))));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn non_negative_rejects(#[case] value: f64) {
        assert!(non_negative("hours", value).is_err());
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty("title", "  Fix login  ").unwrap(), "Fix login");
        assert_eq!(
            non_empty("title", " \t "),
            Err(ValidationError::Empty { field: "title" })
        );
    }

    #[test]
    fn in_range_bounds_inclusive() {
        assert!(in_range("pct", 0.0, 0.0, 100.0).is_ok());
        assert!(in_range("pct", 100.0, 0.0, 100.0).is_ok());
        assert!(in_range("pct", 100.5, 0.0, 100.0).is_err());
    }
}
