//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute so bad input
//! is rejected at parse time, before a workspace is opened.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::domain::{MIN_ID_PREFIX_LEN, validate};

/// Validate a title or name: trimmed, non-empty and single-line.
pub fn validate_title(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Value cannot be empty".to_string());
    }

    if s.contains('\n') || s.contains('\r') {
        return Err("Value cannot contain newline characters".to_string());
    }

    Ok(s.to_string())
}

/// Validate a hex color such as `#FF9500` or `34c759`.
///
/// Returns the normalized uppercase form without `#`.
pub fn validate_color(s: &str) -> Result<String, String> {
    validate::color(s).map_err(|e| e.to_string())
}

/// Validate a completion percentage in `0..=100`.
pub fn validate_percentage(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    validate::in_range("completion_percentage", value, 0.0, 100.0).map_err(|e| e.to_string())
}

/// Validate a non-negative number of hours.
pub fn validate_hours(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    validate::non_negative("hours", value).map_err(|e| e.to_string())
}

/// Validate an id or id prefix: at least four hex digits, hyphens allowed.
pub fn validate_id_prefix(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.len() < MIN_ID_PREFIX_LEN {
        return Err(format!(
            "Id '{s}' is too short (minimum {MIN_ID_PREFIX_LEN} characters)"
        ));
    }

    if !s.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return Err(format!("Id '{s}' must contain only hex digits and hyphens"));
    }

    Ok(s.to_ascii_lowercase())
}

/// Parse a date as `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn validate_date(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("Invalid date '{s}'. Expected YYYY-MM-DD or RFC 3339"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("Fix login", "Fix login")]
    #[case::trimmed("  Fix login  ", "Fix login")]
    fn test_validate_title_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_title(input).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("   ")]
    #[case::newline("Fix\nlogin")]
    fn test_validate_title_invalid(#[case] input: &str) {
        assert!(validate_title(input).is_err());
    }

    #[rstest]
    #[case::hash("#ff9500", "FF9500")]
    #[case::bare("34C759", "34C759")]
    fn test_validate_color_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_color(input).unwrap(), expected);
    }

    #[rstest]
    #[case::short("FFF")]
    #[case::not_hex("GGGGGG")]
    fn test_validate_color_invalid(#[case] input: &str) {
        assert!(validate_color(input).is_err());
    }

    #[rstest]
    #[case::zero("0", true)]
    #[case::full("100", true)]
    #[case::fraction("62.5", true)]
    #[case::negative("-1", false)]
    #[case::over("100.1", false)]
    #[case::text("half", false)]
    fn test_validate_percentage(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(validate_percentage(input).is_ok(), ok);
    }

    #[test]
    fn test_validate_hours_rejects_negative() {
        assert_eq!(validate_hours("2.5").unwrap(), 2.5);
        assert!(validate_hours("-0.5").is_err());
    }

    #[rstest]
    #[case::prefix("8f14", true)]
    #[case::uppercase("8F14E45F", true)]
    #[case::full("8f14e45f-ceea-4e7a-9b1c-2f8d3c5a6b7e", true)]
    #[case::too_short("8f1", false)]
    #[case::not_hex("zzzz", false)]
    fn test_validate_id_prefix(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(validate_id_prefix(input).is_ok(), ok);
    }

    #[test]
    fn test_validate_date_formats() {
        let day = validate_date("2025-03-10").unwrap();
        assert_eq!(day.to_rfc3339(), "2025-03-10T00:00:00+00:00");

        let ts = validate_date("2025-03-10T12:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-03-10T10:30:00+00:00");

        assert!(validate_date("10/03/2025").is_err());
    }
}
