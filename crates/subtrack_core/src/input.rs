//! Parsing helpers for raw form input.
//!
//! # Responsibility
//! - Convert user-typed amount and date strings into typed values before
//!   they reach repository validation.
//!
//! # Invariants
//! - Helpers return `None` instead of erroring; callers decide how to report.
//! - Dates are calendar days; times are always midnight UTC.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_INPUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid date input regex"));

/// Parses an amount such as `"1,299.50"`; rejects empty, negative and
/// non-finite input.
pub fn parse_amount(text: &str) -> Option<f64> {
    let normalized = text.replace(',', "");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return None;
    }
    let value = normalized.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value)
}

/// Parses a strict `YYYY-MM-DD` date, rejecting impossible calendar days.
pub fn parse_date_input(text: &str) -> Option<NaiveDate> {
    let captures = DATE_INPUT_RE.captures(text.trim())?;
    let year = captures[1].parse::<i32>().ok()?;
    let month = captures[2].parse::<u32>().ok()?;
    let day = captures[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Formats a timestamp as its UTC calendar day, `YYYY-MM-DD`.
pub fn format_date_input(value: DateTime<Utc>) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        value.year(),
        value.month(),
        value.day()
    )
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::{format_date_input, parse_amount, parse_date_input, start_of_day_utc};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn parse_amount_strips_separators() {
        assert_eq!(parse_amount(" 1,299.50 "), Some(1299.5));
        assert_eq!(parse_amount("0"), Some(0.0));
    }

    #[test]
    fn parse_amount_rejects_bad_input() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("  ,  "), None);
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn parse_date_input_is_strict() {
        assert_eq!(
            parse_date_input("2025-01-31"),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );
        assert_eq!(parse_date_input("2025-02-29"), None);
        assert_eq!(parse_date_input("2024-13-01"), None);
        assert_eq!(parse_date_input("2025-1-5"), None);
        assert_eq!(parse_date_input("2025-01-01T00:00:00Z"), None);
    }

    #[test]
    fn date_helpers_agree() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let start = start_of_day_utc(date);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert_eq!(format_date_input(start), "2024-02-29");
    }
}
