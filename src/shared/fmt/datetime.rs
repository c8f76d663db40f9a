//! Datetime formatting for cursor readouts.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// How a millisecond timestamp is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatetimeFormat {
    /// `chrono` strftime pattern.
    pub pattern: String,
    /// Offset from UTC in seconds applied before formatting.
    #[serde(default)]
    pub utc_offset_secs: i32,
}

impl Default for DatetimeFormat {
    fn default() -> Self {
        Self {
            pattern: "%-m/%-d/%Y, %-I:%M:%S %p".to_string(),
            utc_offset_secs: 0,
        }
    }
}

impl DatetimeFormat {
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }
}

/// Format a unix timestamp in milliseconds.
///
/// Returns an empty string when the timestamp is not representable or the
/// offset is out of range.
pub fn format_datetime(timestamp_ms: i64, format: &DatetimeFormat) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp_millis(timestamp_ms) else {
        return String::new();
    };
    let Some(offset) = FixedOffset::east_opt(format.utc_offset_secs) else {
        return String::new();
    };
    utc.with_timezone(&offset)
        .format(&format.pattern)
        .to_string()
}
