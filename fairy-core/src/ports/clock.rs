// fairy-core/src/ports/clock.rs

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::error::DomainError;

/// Source of the report timestamp. Injected so runs can be made reproducible.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// `YYYY-MM-DDTHH:MM:SSZ`, second precision.
    fn timestamp(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Accepts RFC 3339 (any offset, normalized to UTC) or a naive
    /// `YYYY-MM-DDTHH:MM:SS`, read as UTC.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| DomainError::InvalidTimestamp(raw.to_string()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_formats_with_z_suffix() {
        let clock = FixedClock::parse("2025-01-01T00:00:00+00:00").unwrap();
        assert_eq!(clock.timestamp(), "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_offsets_are_normalized_and_fraction_dropped() {
        let clock = FixedClock::parse("2025-06-30T14:15:16.789+02:00").unwrap();
        assert_eq!(clock.timestamp(), "2025-06-30T12:15:16Z");
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let clock = FixedClock::parse("2025-01-02T03:04:05").unwrap();
        assert_eq!(clock.timestamp(), "2025-01-02T03:04:05Z");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            FixedClock::parse("yesterday"),
            Err(DomainError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_system_clock_shape() {
        let ts = SystemClock.timestamp();
        assert_eq!(ts.len(), 20);
        assert!(ts.ends_with('Z'));
    }
}
