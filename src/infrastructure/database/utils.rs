//! Shared database helpers.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a stored timestamp.
///
/// Rows written by this crate carry RFC3339, but `SQLite` tooling and older
/// rows may hold the bare `YYYY-MM-DD HH:MM:SS` form; both are accepted and
/// interpreted as UTC.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_datetime("2026-08-01T09:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-08-01T09:30:00+00:00");
    }

    #[test]
    fn test_parse_sqlite_default_format() {
        let dt = parse_datetime("2026-08-01 09:30:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-08-01T09:30:00+00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_datetime("not a timestamp").is_err());
        assert!(parse_datetime("").is_err());
    }
}
