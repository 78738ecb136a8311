//! Value level cell formatting and date parsing.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::column::{Column, Format};
use crate::record::{Record, Value};

pub const MISSING_DATE: &str = "-";

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// What the rendering layer should draw for a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Draw a swatch filled with this color instead of text.
    Swatch(String),
}

/// Parses a value as a point in time.
///
/// Accepts RFC 3339, naive date-times and dates (read as UTC), and numbers
/// as milliseconds since the epoch.
pub fn parse_instant(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::Number(ms) if ms.is_finite() => {
            DateTime::<Utc>::from_timestamp_millis(*ms as i64).map(|dt| dt.fixed_offset())
        }
        Value::Text(s) => parse_instant_str(s.trim()),
        _ => None,
    }
}

fn parse_instant_str(s: &str) -> Option<DateTime<FixedOffset>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().fixed_offset())
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Long form date, e.g. `March 3rd 2024, 4:05 PM`, in the instant's own offset.
pub fn long_date(dt: &DateTime<FixedOffset>) -> String {
    format!(
        "{} {}{} {}, {}",
        dt.format("%B"),
        dt.day(),
        ordinal_suffix(dt.day()),
        dt.year(),
        dt.format("%-I:%M %p")
    )
}

/// Maps a raw value to its display text.
///
/// Currency values are passed through unformatted. Dates that cannot
/// be parsed are shown as they are.
pub fn format_value(value: Option<&Value>, format: Format) -> String {
    match format {
        Format::Date => match value {
            None => MISSING_DATE.to_string(),
            Some(v) if v.is_blank() => MISSING_DATE.to_string(),
            Some(v) => parse_instant(v)
                .map(|dt| long_date(&dt))
                .unwrap_or_else(|| v.as_text().into_owned()),
        },
        Format::None | Format::Currency | Format::Color => {
            value.map(|v| v.as_text().into_owned()).unwrap_or_default()
        }
    }
}

/// Display content of `column` for `record`.
pub fn cell(record: &Record, column: &Column) -> Cell {
    let value = record.get(&column.accessor);
    match column.format {
        Format::Color => Cell::Swatch(value.map(|v| v.as_text().into_owned()).unwrap_or_default()),
        format => Cell::Text(format_value(value, format)),
    }
}
