//! Tolerant date parsing for the incident time series.
//!
//! Values that do not look like dates are coerced to `None` and dropped by
//! the caller, mirroring how unparseable entries must never abort a run.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Date pattern regexes - compiled once at startup
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}").expect("Invalid regex: datetime"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("Invalid regex: ISO"),
    ]
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a raw cell value as a calendar date, or `None` if it does not
/// match any recognized shape. Datetime values are truncated to the date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() || !DATE_PATTERNS.iter().any(|re| re.is_match(value)) {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    // Day-first fallback for values like "25/01/2024" that month-first rejects.
    if let Ok(date) = NaiveDate::parse_from_str(value, "%d/%m/%Y") {
        return Some(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date("2024-01-01"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_date("2024/3/7"), Some(ymd(2024, 3, 7)));
    }

    #[test]
    fn test_parse_us_date() {
        assert_eq!(parse_date("3/1/2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("12-31-2023"), Some(ymd(2023, 12, 31)));
    }

    #[test]
    fn test_parse_day_first_fallback() {
        assert_eq!(parse_date("25/01/2024"), Some(ymd(2024, 1, 25)));
    }

    #[test]
    fn test_parse_datetime_truncates_to_date() {
        assert_eq!(parse_date("2024-01-01 13:45:00"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_date("2024-01-01T13:45:00"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_date("2024-01-01T13:45:00Z"), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn test_unparseable_values_are_none() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("  "), None);
        assert_eq!(parse_date("2024-13-45"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(parse_date(" 2024-01-02 "), Some(ymd(2024, 1, 2)));
    }
}
