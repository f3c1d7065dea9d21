use super::classifier::DayBucket;
use super::tally::{Leader, Tally};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

pub const NO_CONTRIBUTOR: &str = "No one";
pub const NO_ARTIST: &str = "No artists";
pub const UNKNOWN_MONTH: &str = "Unknown";

/// Aggregate statistics for one playlist export, consumed by the slide sequencer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedReport {
    pub total_tracks: usize,
    pub total_minutes: String,
    pub top_contributor: Leader,
    pub top_artist: Leader,
    pub first_to_party: Option<Highlight>,
    #[serde(rename = "lastMinuteMVP")]
    pub last_minute_mvp: Option<Highlight>,
    pub time_analysis: Option<TimeAnalysis>,
    pub genre_analysis: Option<GenreAnalysis>,
    pub popularity_analysis: Option<PopularityAnalysis>,
    pub decade_analysis: Option<DecadeAnalysis>,
    pub monthly_breakdown: MonthlyBreakdown,
    pub new_voices: Vec<NewVoice>,
}

/// The earliest or latest entry in the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub track: String,
    pub user: String,
    pub artist: String,
    pub date: String, // M/D/YYYY in the report time zone
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAnalysis {
    pub peak_time: String,
    pub peak_time_count: usize,
    pub preferred_days: DayBucket,
    pub weekend_count: usize,
    pub weekday_count: usize,
    pub time_of_day_counts: Tally,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreAnalysis {
    pub top_genre: String,
    pub top_genre_count: usize,
    pub unique_genres: usize,
    pub genre_master: String,
    pub genre_master_count: usize,
    pub genre_counts: Tally,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularityAnalysis {
    pub avg_popularity: u32,
    pub underground_tracks: usize,
    pub mainstream_tracks: usize,
    pub music_explorer: String,
    pub explorer_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecadeAnalysis {
    pub top_decade: String,
    pub top_decade_count: usize,
    pub decade_breakdown: Tally,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBreakdown {
    pub peak_month: String,
    pub peak_month_count: usize,
    pub month_counts: Tally,
}

/// A contributor whose first-ever entry falls inside the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVoice {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "serialize_millis")]
    pub first_track_date: DateTime<Utc>,
}

/// ISO 8601 with millisecond precision and a `Z` suffix, e.g. `2025-06-14T14:00:00.000Z`
fn serialize_millis<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl WrappedReport {
    /// Report for an empty window: zero counts, placeholder names, no sections
    pub fn empty() -> Self {
        Self {
            total_tracks: 0,
            total_minutes: format_duration(0),
            top_contributor: Leader::new(NO_CONTRIBUTOR, 0),
            top_artist: Leader::new(NO_ARTIST, 0),
            first_to_party: None,
            last_minute_mvp: None,
            time_analysis: None,
            genre_analysis: None,
            popularity_analysis: None,
            decade_analysis: None,
            monthly_breakdown: MonthlyBreakdown {
                peak_month: UNKNOWN_MONTH.to_string(),
                peak_month_count: 0,
                month_counts: Tally::new(),
            },
            new_voices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_tracks == 0
    }
}

/// Format whole minutes as "{h} hours, {m} minutes", dropping a zero minutes clause
pub fn format_duration(total_minutes: u64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    match (hours, minutes) {
        (0, m) => format!("{m} minutes"),
        (h, 0) => format!("{h} hours"),
        (h, m) => format!("{h} hours, {m} minutes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(125), "2 hours, 5 minutes");
        assert_eq!(format_duration(60), "1 hours");
        assert_eq!(format_duration(45), "45 minutes");
        assert_eq!(format_duration(0), "0 minutes");
    }

    #[test]
    fn test_new_voice_date_has_milliseconds() {
        let voice = NewVoice {
            id: "u1".to_string(),
            name: "Carol".to_string(),
            first_track_date: DateTime::from_timestamp(1_749_909_600, 0).unwrap(),
        };
        let json = serde_json::to_value(&voice).unwrap();
        assert_eq!(json["firstTrackDate"], "2025-06-14T14:00:00.000Z");
    }

    #[test]
    fn test_empty_report_serialization() {
        let json = serde_json::to_value(WrappedReport::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalTracks": 0,
                "totalMinutes": "0 minutes",
                "topContributor": { "name": "No one", "count": 0 },
                "topArtist": { "name": "No artists", "count": 0 },
                "firstToParty": null,
                "lastMinuteMVP": null,
                "timeAnalysis": null,
                "genreAnalysis": null,
                "popularityAnalysis": null,
                "decadeAnalysis": null,
                "monthlyBreakdown": { "peakMonth": "Unknown", "peakMonthCount": 0, "monthCounts": {} },
                "newVoices": []
            })
        );
    }
}
