use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Fixed-width layout used for every stored timestamp. Lexicographic order of
/// formatted strings matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifetime of a session token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Expiry stamp for a token issued at `issued_at`.
pub fn token_expiry(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + Duration::seconds(TOKEN_TTL_SECS)
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|ndt| ndt.and_utc())
}

/// A token is expired once `now` reaches `expires_at`.
pub fn is_expired(now: &str, expires_at: &str) -> bool {
    now >= expires_at
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_is_fixed_width() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-07 09:05:01");
        assert_eq!(parse_timestamp("2024-03-07 09:05:01"), Some(at));
    }

    #[test]
    fn test_expiry_boundary() {
        let expires = "2024-03-07 10:00:00";
        assert!(!is_expired("2024-03-07 09:59:59", expires));
        assert!(is_expired("2024-03-07 10:00:00", expires));
        assert!(is_expired("2024-03-07 10:00:01", expires));
        // Day rollover still orders correctly.
        assert!(is_expired("2024-03-08 00:00:00", "2024-03-07 23:59:59"));
    }

    #[test]
    fn test_token_expiry_is_one_hour() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 30, 0).unwrap();
        assert_eq!(format_timestamp(token_expiry(at)), "2025-01-01 00:30:00");
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        assert!(parse_timestamp("2024-03-07T09:05:01Z").is_none());
    }
}
