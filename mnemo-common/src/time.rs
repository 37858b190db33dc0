//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as an RFC 3339 string with millisecond precision
///
/// Used as the memory date when a memory is created without one.
pub fn now_rfc3339() -> String {
    now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Milliseconds since the Unix epoch
pub fn epoch_millis() -> i64 {
    now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_rfc3339_round_trips_through_chrono() {
        let text = now_rfc3339();
        assert!(text.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&text).is_ok());
    }

    #[test]
    fn test_epoch_millis_is_recent() {
        assert!(epoch_millis() > 946_684_800_000);
    }
}
