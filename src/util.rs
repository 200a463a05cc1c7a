// Utility helpers for parsing and formatting.
//
// This module centralizes the "dirty" CSV/number/date handling so the rest
// of the code can assume clean, typed, optional values.
use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports (commas,
/// spaces, stray text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed; a blank
///   cell means "not reported", never zero.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "").replace("%", "");
    s.parse::<f64>().ok()
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // Extract dates are expected in `YYYY-MM-DD` format.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse the planned-completion column of the project tracker, which mixes
/// several human-entered formats ("June 2021", "30 November 2021",
/// "08/06/21", "Sept 21"). Returns `None` when no format matches.
pub fn parse_completion_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }
    // "Sept" is common in the source but not a chrono abbreviation.
    let cleaned = cleaned.replace("Sept.", "Sep").replace("Sept", "Sep");

    let full_formats = ["%Y-%m-%d", "%d/%m/%y", "%d/%m/%Y", "%d %B %Y", "%d %b %Y"];
    for fmt in full_formats {
        if let Ok(d) = NaiveDate::parse_from_str(&cleaned, fmt) {
            return Some(d);
        }
    }
    // Month-year forms carry no day; anchor them to the first.
    let anchored = format!("1 {}", cleaned);
    let month_formats = ["%d %B %Y", "%d %b %Y", "%d %B %y", "%d %b %y"];
    for fmt in month_formats {
        if let Ok(d) = NaiveDate::parse_from_str(&anchored, fmt) {
            return Some(d);
        }
    }
    None
}

/// First day of the calendar month containing `date`.
pub fn month_floor(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for
    // row counts in console messages (e.g., `1,240 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_parsing_is_forgiving() {
        assert_eq!(parse_f64_safe(Some("125,000")), Some(125_000.0));
        assert_eq!(parse_f64_safe(Some(" 78.5 ")), Some(78.5));
        assert_eq!(parse_f64_safe(Some("79.2%")), Some(79.2));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn completion_dates_accept_source_formats() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(parse_completion_date("2021-11-30"), Some(d(2021, 11, 30)));
        assert_eq!(parse_completion_date("30 November 2021"), Some(d(2021, 11, 30)));
        assert_eq!(parse_completion_date("08/06/21"), Some(d(2021, 6, 8)));
        assert_eq!(parse_completion_date("June 2021"), Some(d(2021, 6, 1)));
        assert_eq!(parse_completion_date("Sept  21"), Some(d(2021, 9, 1)));
        assert_eq!(parse_completion_date("TBC"), None);
    }

    #[test]
    fn month_floor_clamps_to_first_day() {
        let d = NaiveDate::from_ymd_opt(2021, 10, 17).unwrap();
        assert_eq!(month_floor(d), NaiveDate::from_ymd_opt(2021, 10, 1).unwrap());
    }
}
