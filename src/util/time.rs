//! Time and date parsing utilities.

use crate::error::{Result, TrackerError};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Parse a flexible timestamp string into a `DateTime<Utc>`.
///
/// Supports:
/// - RFC3339: `2025-01-15T12:00:00Z`, `2025-01-15T12:00:00+00:00`
/// - Simple date: `2025-01-15` (midnight UTC)
/// - Epoch milliseconds: `1700000000000`
///
/// # Errors
///
/// Returns a validation error naming `field_name` if the format is
/// unrecognized or the value is out of the representable range.
pub fn parse_timestamp(s: &str, field_name: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    // Try RFC3339 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try simple date (YYYY-MM-DD) at midnight UTC
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive_dt = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
            TrackerError::validation(field_name, "date has no representable midnight")
        })?;
        return Ok(Utc.from_utc_datetime(&naive_dt));
    }

    // Try epoch milliseconds
    if let Ok(millis) = s.parse::<i64>() {
        return timestamp_from_millis(millis, field_name);
    }

    Err(TrackerError::validation(
        field_name,
        "invalid timestamp (try RFC3339, 2025-01-15, or epoch milliseconds)",
    ))
}

/// Convert epoch milliseconds into a `DateTime<Utc>`.
///
/// # Errors
///
/// Returns a validation error naming `field_name` if the value is outside
/// chrono's representable range.
pub fn timestamp_from_millis(millis: i64, field_name: &str) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| TrackerError::validation(field_name, "epoch milliseconds out of range"))
}
