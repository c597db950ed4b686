//! Timezone-aware timestamps as stored in the journal.
//!
//! Values are written as RFC 3339 text carrying their original offset.
//! Rows written by older tools may hold a naive date-time or a bare date;
//! those are read as UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

pub type Timestamp = DateTime<FixedOffset>;

/// Current time in UTC with an explicit `+00:00` offset.
pub fn now() -> Timestamp {
    Utc::now().fixed_offset()
}

pub fn format_timestamp(value: &Timestamp) -> String {
    value.to_rfc3339()
}

/// Parses a stored timestamp, returning `None` for unreadable text.
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
