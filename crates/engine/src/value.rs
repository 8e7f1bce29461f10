//! Total parsers for the numeric and date comparisons.
//!
//! Filter and sort never rely on implicit coercion: every text-to-number or
//! text-to-date conversion goes through these functions and the caller
//! decides what `Unparseable` means for its operation.

use chrono::NaiveDate;

/// Result of reading a number out of free text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberParse {
    Parsed(f64),
    Unparseable,
}

impl NumberParse {
    pub fn value(self) -> Option<f64> {
        match self {
            NumberParse::Parsed(n) => Some(n),
            NumberParse::Unparseable => None,
        }
    }
}

/// Result of reading a calendar date out of free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateParse {
    Parsed(NaiveDate),
    Unparseable,
}

impl DateParse {
    pub fn value(self) -> Option<NaiveDate> {
        match self {
            DateParse::Parsed(d) => Some(d),
            DateParse::Unparseable => None,
        }
    }
}

/// Parse the longest numeric prefix of `text` after leading whitespace.
///
/// `"500"`, `" 42.5 kg"` and `"1e3"` parse; `""`, `"abc"`, `"-"` and `"."` do not.
/// A date such as `"2024-01-15"` reads as `2024`.
pub fn parse_number(text: &str) -> NumberParse {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if frac_end > frac_start {
            end = frac_end;
        }
    }

    if digits == 0 {
        return NumberParse::Unparseable;
    }

    // Exponent only counts when it carries at least one digit
    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(n) if n.is_finite() => NumberParse::Parsed(n),
        _ => NumberParse::Unparseable,
    }
}

/// Coerce edit or import text into an estimated value.
/// Unparseable, negative and non-finite input all become 0.
pub fn coerce_amount(text: &str) -> f64 {
    match parse_number(text) {
        NumberParse::Parsed(n) if n >= 0.0 => n,
        _ => 0.0,
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a calendar date. Accepts ISO dates, ISO date-times (date part only),
/// `YYYY/MM/DD` and US-style `MM/DD/YYYY`.
pub fn parse_date(text: &str) -> DateParse {
    let s = text.trim();
    if s.is_empty() {
        return DateParse::Unparseable;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return DateParse::Parsed(date);
        }
    }

    // 2024-01-15T09:30:00Z and friends
    if let Some((date_part, _)) = s.split_once('T') {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            return DateParse::Parsed(date);
        }
    }

    DateParse::Unparseable
}

/// Render a number the way the sheet shows it in text form (`500`, `12.5`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_plain() {
        assert_eq!(parse_number("500"), NumberParse::Parsed(500.0));
        assert_eq!(parse_number("-12.5"), NumberParse::Parsed(-12.5));
        assert_eq!(parse_number("+3"), NumberParse::Parsed(3.0));
        assert_eq!(parse_number(".5"), NumberParse::Parsed(0.5));
        assert_eq!(parse_number("1e3"), NumberParse::Parsed(1000.0));
    }

    #[test]
    fn test_parse_number_prefix() {
        assert_eq!(parse_number("  42.5 kg"), NumberParse::Parsed(42.5));
        assert_eq!(parse_number("7."), NumberParse::Parsed(7.0));
        assert_eq!(parse_number("2e"), NumberParse::Parsed(2.0));
        assert_eq!(parse_number("2024-01-15"), NumberParse::Parsed(2024.0));
    }

    #[test]
    fn test_parse_number_unparseable() {
        assert_eq!(parse_number(""), NumberParse::Unparseable);
        assert_eq!(parse_number("abc"), NumberParse::Unparseable);
        assert_eq!(parse_number("-"), NumberParse::Unparseable);
        assert_eq!(parse_number("."), NumberParse::Unparseable);
        assert_eq!(parse_number("$500"), NumberParse::Unparseable);
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("1500"), 1500.0);
        assert_eq!(coerce_amount("12.75"), 12.75);
        assert_eq!(coerce_amount("lots"), 0.0);
        assert_eq!(coerce_amount("-40"), 0.0);
    }

    #[test]
    fn test_parse_date_formats() {
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15"), DateParse::Parsed(jan15));
        assert_eq!(parse_date("2024/01/15"), DateParse::Parsed(jan15));
        assert_eq!(parse_date("01/15/2024"), DateParse::Parsed(jan15));
        assert_eq!(parse_date("2024-01-15T09:30:00Z"), DateParse::Parsed(jan15));
    }

    #[test]
    fn test_parse_date_unparseable() {
        assert_eq!(parse_date(""), DateParse::Unparseable);
        assert_eq!(parse_date("soon"), DateParse::Unparseable);
        assert_eq!(parse_date("2024-13-40"), DateParse::Unparseable);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(500.0), "500");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.0), "0");
    }
}
