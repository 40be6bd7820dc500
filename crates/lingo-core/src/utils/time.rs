//! Time Utilities

use chrono::{DateTime, Utc};

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        now_utc()
    }
}

/// Get current UTC timestamp
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Parse datetime from RFC 3339 string
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format datetime as RFC 3339 string
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_system_clock_tracks_now() {
        let before = now_utc();
        let now = SystemClock.now();
        assert!(now >= before);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_datetime("not a date").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn test_parse_valid() {
        let dt = parse_datetime("2024-01-15T10:30:00.000Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(format_datetime(&dt), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_manual_clock() {
        let t0 = parse_datetime("2024-01-15T10:30:00Z").unwrap();
        let clock = testing::ManualClock::new(t0);
        clock.advance(chrono::Duration::hours(1));
        assert_eq!(clock.now(), t0 + chrono::Duration::hours(1));
        clock.set(t0);
        assert_eq!(clock.now(), t0);
    }
}
