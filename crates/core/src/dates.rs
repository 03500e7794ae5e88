//! Date display and input conversion.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

pub const NOT_RECORDED: &str = "Not recorded";
pub const INVALID_DATE: &str = "Invalid date";

/// Format a visit date as "Month D, YYYY".
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates. A missing or blank value
/// reads "Not recorded"; anything unparseable reads "Invalid date".
pub fn format_visit_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return NOT_RECORDED.to_string();
    };

    match parse_date(raw) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Calendar date of an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Convert `DD/MM/YYYY` or `DD/MM/YY` into the `YYYY-MM-DD` form input format.
///
/// Two-digit years pivot on the current year. Anything that is not three numeric
/// slash-separated parts yields an empty string.
pub fn format_date_for_input(raw: &str) -> String {
    format_date_with_pivot(raw, Utc::now().year())
}

fn format_date_with_pivot(raw: &str, current_year: i32) -> String {
    let parts: Vec<&str> = raw.trim().split('/').map(str::trim).collect();
    let [day, month, year] = parts.as_slice() else {
        return String::new();
    };
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if ![*day, *month, *year].into_iter().all(numeric) {
        return String::new();
    }

    let year = if year.len() == 2 {
        let yy: i32 = year.parse().unwrap_or_default();
        let century = current_year - current_year.rem_euclid(100);
        let full = if yy <= current_year.rem_euclid(100) {
            century + yy
        } else {
            century - 100 + yy
        };
        full.to_string()
    } else {
        year.to_string()
    };

    format!("{year}-{month:0>2}-{day:0>2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_date_formats() {
        assert_eq!(
            format_visit_date(Some("2024-03-05T00:00:00.000Z")),
            "March 5, 2024"
        );
        assert_eq!(format_visit_date(Some("2023-12-25")), "December 25, 2023");
        assert_eq!(format_visit_date(None), NOT_RECORDED);
        assert_eq!(format_visit_date(Some("  ")), NOT_RECORDED);
        assert_eq!(format_visit_date(Some("last tuesday")), INVALID_DATE);
    }

    #[test]
    fn test_input_date_conversion() {
        assert_eq!(format_date_for_input("05/03/99"), "1999-03-05");
        assert_eq!(format_date_for_input("05/03/1999"), "1999-03-05");
        assert_eq!(format_date_for_input("5/3/2001"), "2001-03-05");
    }

    #[test]
    fn test_malformed_input_dates_are_empty() {
        assert_eq!(format_date_for_input(""), "");
        assert_eq!(format_date_for_input("05-03-1999"), "");
        assert_eq!(format_date_for_input("05/03"), "");
        assert_eq!(format_date_for_input("05/03/1999/1"), "");
        assert_eq!(format_date_for_input("aa/03/1999"), "");
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(format_date_with_pivot("01/01/26", 2026), "2026-01-01");
        assert_eq!(format_date_with_pivot("01/01/27", 2026), "1927-01-01");
        assert_eq!(format_date_with_pivot("01/01/00", 2026), "2000-01-01");
    }
}
