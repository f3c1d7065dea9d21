use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const UNKNOWN_DECADE: &str = "Unknown";

/// Coarse part of the day an entry was added in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    LateNight,
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn label(self) -> &'static str {
        match self {
            Self::LateNight => "Late Night",
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum DayBucket {
    Weekend,
    #[default]
    Weekday,
}

impl DayBucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::Weekend => "Weekend",
            Self::Weekday => "Weekday",
        }
    }
}

impl fmt::Display for DayBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket a wall-clock time by hour: [0,6) [6,12) [12,18) [18,22) [22,24)
pub fn time_of_day(wall_clock: &NaiveDateTime) -> TimeOfDay {
    match wall_clock.hour() {
        0..=5 => TimeOfDay::LateNight,
        6..=11 => TimeOfDay::Morning,
        12..=17 => TimeOfDay::Afternoon,
        18..=21 => TimeOfDay::Evening,
        _ => TimeOfDay::Night,
    }
}

pub fn day_bucket(wall_clock: &NaiveDateTime) -> DayBucket {
    match wall_clock.weekday() {
        Weekday::Sat | Weekday::Sun => DayBucket::Weekend,
        _ => DayBucket::Weekday,
    }
}

pub fn month_abbrev(wall_clock: &NaiveDateTime) -> &'static str {
    MONTH_NAMES[wall_clock.month0() as usize]
}

/// Decade label ("1980s") from a year-prefixed release date.
///
/// Absent dates and dates whose first four characters are not a year both map to
/// [`UNKNOWN_DECADE`].
pub fn release_decade(release_date: Option<&str>) -> String {
    let Some(date) = release_date else {
        return UNKNOWN_DECADE.to_string();
    };

    match leading_year(date) {
        Some(year) => format!("{}s", year.div_euclid(10) * 10),
        None => {
            log::debug!("Unparseable release date '{date}', using {UNKNOWN_DECADE}");
            UNKNOWN_DECADE.to_string()
        }
    }
}

fn leading_year(date: &str) -> Option<i32> {
    let prefix = date.get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_time_of_day_boundaries() {
        assert_eq!(time_of_day(&at(2025, 5, 1, 0)), TimeOfDay::LateNight);
        assert_eq!(time_of_day(&at(2025, 5, 1, 5)), TimeOfDay::LateNight);
        assert_eq!(time_of_day(&at(2025, 5, 1, 6)), TimeOfDay::Morning);
        assert_eq!(time_of_day(&at(2025, 5, 1, 11)), TimeOfDay::Morning);
        assert_eq!(time_of_day(&at(2025, 5, 1, 12)), TimeOfDay::Afternoon);
        assert_eq!(time_of_day(&at(2025, 5, 1, 17)), TimeOfDay::Afternoon);
        assert_eq!(time_of_day(&at(2025, 5, 1, 18)), TimeOfDay::Evening);
        assert_eq!(time_of_day(&at(2025, 5, 1, 21)), TimeOfDay::Evening);
        assert_eq!(time_of_day(&at(2025, 5, 1, 22)), TimeOfDay::Night);
        assert_eq!(time_of_day(&at(2025, 5, 1, 23)), TimeOfDay::Night);
    }

    #[test]
    fn test_day_bucket() {
        // 2025-05-03 is a Saturday
        assert_eq!(day_bucket(&at(2025, 5, 3, 12)), DayBucket::Weekend);
        assert_eq!(day_bucket(&at(2025, 5, 4, 12)), DayBucket::Weekend);
        assert_eq!(day_bucket(&at(2025, 5, 5, 12)), DayBucket::Weekday);
        assert_eq!(day_bucket(&at(2025, 5, 2, 12)), DayBucket::Weekday);
    }

    #[test]
    fn test_month_abbrev() {
        assert_eq!(month_abbrev(&at(2025, 1, 15, 12)), "Jan");
        assert_eq!(month_abbrev(&at(2025, 3, 1, 0)), "Mar");
        assert_eq!(month_abbrev(&at(2025, 12, 31, 23)), "Dec");
    }

    #[test]
    fn test_release_decade() {
        assert_eq!(release_decade(Some("1994-03-01")), "1990s");
        assert_eq!(release_decade(Some("1987")), "1980s");
        assert_eq!(release_decade(Some("2020-01")), "2020s");
        assert_eq!(release_decade(None), "Unknown");
    }

    #[test]
    fn test_release_decade_guards_malformed_years() {
        assert_eq!(release_decade(Some("")), "Unknown");
        assert_eq!(release_decade(Some("19")), "Unknown");
        assert_eq!(release_decade(Some("n/a")), "Unknown");
        assert_eq!(release_decade(Some("abcd-01-01")), "Unknown");
        assert_eq!(release_decade(Some("-199")), "Unknown");
    }

    #[test]
    fn test_labels() {
        assert_eq!(TimeOfDay::LateNight.to_string(), "Late Night");
        assert_eq!(DayBucket::Weekend.to_string(), "Weekend");
    }
}
