//! Raw field values and the shared coercion rules
//!
//! Listing records come from a loosely-typed backend: money columns are
//! sometimes numbers, sometimes strings with thousands separators, and
//! sometimes missing. Every consumer goes through [`parse_number`] so the
//! "strip separators, parse, default to zero" rule lives in one place.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// A numeric column as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumericField {
    Number(serde_json::Number),
    Text(String),
    /// Anything else (booleans, objects). Coerces to zero.
    Other(Value),
}

impl NumericField {
    /// Coerce to `f64`, never failing
    pub fn as_f64(&self) -> f64 {
        match self {
            NumericField::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
            NumericField::Text(s) => parse_number(s),
            NumericField::Other(_) => 0.0,
        }
    }

    /// Whether the raw value is an empty string
    pub fn is_blank(&self) -> bool {
        matches!(self, NumericField::Text(s) if s.trim().is_empty())
    }
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(NumericField::Number)
            .unwrap_or(NumericField::Other(Value::Null))
    }
}

impl From<i64> for NumericField {
    fn from(value: i64) -> Self {
        NumericField::Number(value.into())
    }
}

impl From<&str> for NumericField {
    fn from(value: &str) -> Self {
        NumericField::Text(value.to_string())
    }
}

/// Deserialize a free-text field, accepting numbers as their text form
///
/// Ids and names written by older imports are sometimes numeric. Values of
/// any other type read as absent rather than failing the whole record.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Deserialize a yes/no flag from a bool, `"true"`/`"false"` or `0`/`1`
///
/// Anything else reads as absent.
pub fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Parse a user- or backend-supplied number
///
/// Thousands separators are stripped, then the longest leading decimal
/// literal is parsed (`"12.5평"` is `12.5`). Anything unparsable is `0.0`.
pub fn parse_number(raw: &str) -> f64 {
    static NUMBER_PREFIX: OnceLock<Regex> = OnceLock::new();
    let regex = NUMBER_PREFIX.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap()
    });

    let cleaned = raw.replace(',', "");
    regex
        .find(&cleaned)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse an optional filter bound; blank input means "no bound"
pub fn parse_bound(raw: &str) -> Option<f64> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(parse_number(raw))
    }
}

/// Reduce a timestamp to its calendar day (`YYYY-MM-DD`)
///
/// Offsets are kept as written: `2024-01-01T23:30:00+09:00` is the 1st.
/// Unparsable input yields an empty string; sorting treats it as later
/// than any real day.
pub fn calendar_day(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return dt.date().format("%Y-%m-%d").to_string();
        }
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => String::new(),
    }
}

/// Format a number with comma grouping and at most three fraction digits
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let text = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((&text, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_strips_separators() {
        assert_eq!(parse_number("1,000"), 1000.0);
        assert_eq!(parse_number("12,345,678.5"), 12345678.5);
    }

    #[test]
    fn test_parse_number_leading_prefix() {
        assert_eq!(parse_number("12.5평"), 12.5);
        assert_eq!(parse_number("  -3층"), -3.0);
        assert_eq!(parse_number(".5"), 0.5);
    }

    #[test]
    fn test_parse_number_failure_is_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("협의"), 0.0);
        assert_eq!(parse_number("abc12"), 0.0);
    }

    #[test]
    fn test_parse_bound_blank_is_none() {
        assert_eq!(parse_bound(""), None);
        assert_eq!(parse_bound("   "), None);
        assert_eq!(parse_bound("1,001"), Some(1001.0));
    }

    #[test]
    fn test_numeric_field_coercion() {
        assert_eq!(NumericField::from(42).as_f64(), 42.0);
        assert_eq!(NumericField::from("3,500").as_f64(), 3500.0);
        assert_eq!(NumericField::Other(Value::Bool(true)).as_f64(), 0.0);
        assert!(NumericField::from(" ").is_blank());
        assert!(!NumericField::from(0).is_blank());
    }

    #[test]
    fn test_numeric_field_deserialize_mixed() {
        let values: Vec<NumericField> =
            serde_json::from_str(r#"[1000, "2,000", true, 1.5]"#).expect("should parse");
        let coerced: Vec<f64> = values.iter().map(NumericField::as_f64).collect();
        assert_eq!(coerced, vec![1000.0, 2000.0, 0.0, 1.5]);
    }

    #[test]
    fn test_calendar_day_formats() {
        assert_eq!(calendar_day("2024-01-01T10:00:00Z"), "2024-01-01");
        assert_eq!(calendar_day("2024-01-01T23:30:00+09:00"), "2024-01-01");
        assert_eq!(calendar_day("2024-03-05T08:00:00.123"), "2024-03-05");
        assert_eq!(calendar_day("2024-03-05 08:00:00"), "2024-03-05");
        assert_eq!(calendar_day("2024-03-05"), "2024-03-05");
        assert_eq!(calendar_day("not a date"), "");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234567.5), "1,234,567.5");
        assert_eq!(format_thousands(-25000.0), "-25,000");
        assert_eq!(format_thousands(0.12345), "0.123");
        assert_eq!(format_thousands(999.0), "999");
    }
}
