use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use std::str::FromStr;
use thiserror::Error;

/// 2025-03-01T00:00:00Z
const DEFAULT_WINDOW_START_SECS: i64 = 1_740_787_200;
/// 2025-11-30T23:59:59Z
const DEFAULT_WINDOW_END_SECS: i64 = 1_764_547_199;

/// Inclusive UTC interval that scopes the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Default for AnalysisWindow {
    fn default() -> Self {
        Self {
            start: DateTime::from_timestamp(DEFAULT_WINDOW_START_SECS, 0)
                .expect("default window start is a valid timestamp"),
            end: DateTime::from_timestamp(DEFAULT_WINDOW_END_SECS, 0)
                .expect("default window end is a valid timestamp"),
        }
    }
}

impl AnalysisWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Both bounds are inclusive
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

/// Time zone used for every wall-clock classification (hour, weekday, month, date label)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportTimezone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl ReportTimezone {
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// Wall-clock reading of an instant in this zone
    pub fn wall_clock(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => instant.with_timezone(&Local).naive_local(),
            Self::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }

    /// Resolve a zone-less timestamp. Ambiguous local times take the earlier instant.
    pub fn resolve(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Fixed(offset) => offset
                .from_local_datetime(naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time zone '{0}' (expected 'local', 'UTC' or an offset like '+02:00')")]
pub struct ParseTimezoneError(String);

impl FromStr for ReportTimezone {
    type Err = ParseTimezoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(Self::utc());
        }

        let invalid = || ParseTimezoneError(s.to_string());
        let (sign, rest) = match trimmed.as_bytes().first() {
            Some(b'+') => (1, &trimmed[1..]),
            Some(b'-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
        let hours: u32 = hours.parse().map_err(|_| invalid())?;
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60) as i32)
            .map(Self::Fixed)
            .ok_or_else(invalid)
    }
}

/// Parse an `added_at` value into an instant.
///
/// RFC 3339 is tried first. Zone-less date-times are read in `timezone`, and a bare
/// date is taken as UTC midnight. Returns `None` for anything else.
pub fn parse_added_at(raw: &str, timezone: &ReportTimezone) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return timezone.resolve(&naive);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_default_window_bounds() {
        let window = AnalysisWindow::default();
        assert_eq!(window.start, utc("2025-03-01T00:00:00Z"));
        assert_eq!(window.end, utc("2025-11-30T23:59:59Z"));
    }

    #[test]
    fn test_window_is_inclusive_on_both_ends() {
        let window = AnalysisWindow::default();
        assert!(window.contains(&utc("2025-03-01T00:00:00Z")));
        assert!(!window.contains(&utc("2025-02-28T23:59:59Z")));
        assert!(window.contains(&utc("2025-11-30T23:59:59Z")));
        assert!(!window.contains(&utc("2025-12-01T00:00:00.000Z")));
    }

    #[test]
    fn test_parse_added_at_formats() {
        let tz = ReportTimezone::utc();
        assert_eq!(
            parse_added_at("2025-04-02T10:15:00Z", &tz),
            Some(utc("2025-04-02T10:15:00Z"))
        );
        assert_eq!(
            parse_added_at("2025-04-02T12:15:00+02:00", &tz),
            Some(utc("2025-04-02T10:15:00Z"))
        );
        assert_eq!(
            parse_added_at("2025-04-02 10:15:00", &tz),
            Some(utc("2025-04-02T10:15:00Z"))
        );
        assert_eq!(
            parse_added_at("2025-04-02", &tz),
            Some(utc("2025-04-02T00:00:00Z"))
        );
    }

    #[test]
    fn test_naive_timestamps_use_report_timezone() {
        let tz: ReportTimezone = "+02:00".parse().unwrap();
        assert_eq!(
            parse_added_at("2025-04-02T12:15:00", &tz),
            Some(utc("2025-04-02T10:15:00Z"))
        );
    }

    #[test]
    fn test_parse_added_at_rejects_garbage() {
        let tz = ReportTimezone::utc();
        assert_eq!(parse_added_at("", &tz), None);
        assert_eq!(parse_added_at("yesterday", &tz), None);
        assert_eq!(parse_added_at("2025-13-45T00:00:00Z", &tz), None);
    }

    #[test]
    fn test_timezone_from_str() {
        assert_eq!("local".parse::<ReportTimezone>(), Ok(ReportTimezone::Local));
        assert_eq!("UTC".parse::<ReportTimezone>(), Ok(ReportTimezone::utc()));
        assert_eq!(
            "-05:30".parse::<ReportTimezone>(),
            Ok(ReportTimezone::Fixed(
                FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap()
            ))
        );
        assert_eq!(
            "+9".parse::<ReportTimezone>(),
            Ok(ReportTimezone::Fixed(FixedOffset::east_opt(9 * 3600).unwrap()))
        );
        assert!("Europe/Berlin".parse::<ReportTimezone>().is_err());
        assert!("+25:00".parse::<ReportTimezone>().is_err());
    }

    #[test]
    fn test_timezone_error_message() {
        let err = "Mars/Olympus".parse::<ReportTimezone>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid time zone 'Mars/Olympus' (expected 'local', 'UTC' or an offset like '+02:00')"
        );
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }
}
