pub mod health;
pub mod library;
pub mod progress;

use chrono::{DateTime, Utc};

use super::models::ErrorReply;

/// Query-string `ts` is epoch milliseconds.
pub fn parse_since<T: ErrorReply>(since: Option<i64>) -> Result<Option<DateTime<Utc>>, T> {
    match since {
        None => Ok(None),
        Some(ms) => DateTime::from_timestamp_millis(ms)
            .map(Some)
            .ok_or_else(|| T::bad_request("ts is out of range".into())),
    }
}
