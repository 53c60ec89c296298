use chrono::{DateTime, NaiveDateTime};

/// Naive wall-clock layouts, read as UTC. `%.f` also accepts no fraction.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601-like timestamp into epoch millis.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00.050Z`, `...+02:00`) and naive
/// `YYYY-MM-DD[T ]HH:MM:SS[.ffffff]` as written by the run recorder. Sub-ms
/// digits are floored.
pub fn parse_timestamp_millis(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_1_2024: i64 = 1_704_067_200_000;

    #[test]
    fn rfc3339_with_zulu() {
        assert_eq!(
            parse_timestamp_millis("2024-01-01T00:00:00.000Z"),
            Some(JAN_1_2024)
        );
        assert_eq!(
            parse_timestamp_millis("2024-01-01T00:00:00.050Z"),
            Some(JAN_1_2024 + 50)
        );
    }

    #[test]
    fn rfc3339_with_offset() {
        assert_eq!(
            parse_timestamp_millis("2024-01-01T02:00:00.000+02:00"),
            Some(JAN_1_2024)
        );
    }

    #[test]
    fn naive_recorder_output() {
        assert_eq!(
            parse_timestamp_millis("2024-01-01 00:00:01.123456"),
            Some(JAN_1_2024 + 1_123)
        );
        assert_eq!(
            parse_timestamp_millis("2024-01-01T00:00:01.999999"),
            Some(JAN_1_2024 + 1_999)
        );
        assert_eq!(
            parse_timestamp_millis("  2024-01-01 00:00:02 "),
            Some(JAN_1_2024 + 2_000)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_timestamp_millis(""), None);
        assert_eq!(parse_timestamp_millis("yesterday"), None);
        assert_eq!(parse_timestamp_millis("2024/01/01 00:00:00"), None);
        assert_eq!(parse_timestamp_millis("2024-13-01T00:00:00Z"), None);
    }
}
