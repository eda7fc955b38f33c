// Parsing of loosely typed client fields into domain values

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;

/// Years whose RFC 3339 rendering has four digits. Stored datetimes are compared
/// as text, so instants outside this range would sort out of order.
pub const STORABLE_YEARS: RangeInclusive<i32> = 0..=9999;

/// Parse a client-supplied logical timestamp.
///
/// Accepts epoch milliseconds (integer or float) or an RFC 3339 string, within
/// [`STORABLE_YEARS`].
pub fn parse_logical_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    parse_instant(value).filter(|dt| STORABLE_YEARS.contains(&dt.year()))
}

fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            if let Some(ms) = n.as_i64() {
                DateTime::from_timestamp_millis(ms)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .and_then(|f| DateTime::from_timestamp_millis(f.trunc() as i64))
            }
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        _ => None,
    }
}

/// A key component must be present and not blank.
pub fn require_key_part(field: &str, value: Option<String>) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(format!("{field} must not be empty")),
        None => Err(format!("missing required field {field}")),
    }
}

pub fn require_datetime(value: Option<&Value>) -> Result<DateTime<Utc>, String> {
    let value = value.ok_or_else(|| "missing required field datetime".to_string())?;
    parse_logical_timestamp(value).ok_or_else(|| "invalid datetime format".to_string())
}
