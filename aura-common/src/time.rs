//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current Unix epoch time in milliseconds, as stamped on every API response
pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a second count as `M:SS` for countdown display
pub fn format_countdown(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
