//! Date parsing and formatting for date-typed fields.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::fmt::Write;

/// Output format used when no date format is configured.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Interprets an edit value as a point in time.
///
/// Strings are tried as RFC 3339, then the fixed local-less layouts, then the
/// configured format. Numbers are epoch milliseconds. Everything else, and
/// every string that matches nothing, yields `None`.
pub fn parse_date(value: &Value, format: Option<&str>) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        Value::String(s) => parse_date_str(s.trim(), format),
        _ => None,
    }
}

fn parse_date_str(s: &str, format: Option<&str>) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt.and_utc());
    }

    let format = format.filter(|f| is_valid_format(f))?;
    if let Ok(dt) = DateTime::parse_from_str(s, format) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Formats `dt` with the configured format, or ISO-8601 with milliseconds.
///
/// A format chrono cannot render falls back to ISO.
pub fn format_date(dt: &DateTime<Utc>, format: Option<&str>) -> String {
    if let Some(format) = format.filter(|f| is_valid_format(f)) {
        let mut out = String::new();
        if write!(out, "{}", dt.format(format)).is_ok() {
            return out;
        }
    }
    dt.format(ISO_FORMAT).to_string()
}

/// Whether chrono understands every specifier in `format`.
pub fn is_valid_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
