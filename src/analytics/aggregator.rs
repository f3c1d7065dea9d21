use super::classifier::{self, DayBucket};
use super::report::{
    DecadeAnalysis, GenreAnalysis, Highlight, MonthlyBreakdown, NewVoice, PopularityAnalysis,
    TimeAnalysis, WrappedReport, format_duration,
};
use super::tally::{Leader, Tally, max_by_count};
use super::window::{AnalysisWindow, ReportTimezone, parse_added_at};
use crate::models::PlaylistEntry;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::HashSet;

const UNDERGROUND_BELOW: u32 = 50;
const MAINSTREAM_FROM: u32 = 70;
const EXPLORER_BELOW: u32 = 40;

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_USER: &str = "Unknown User";

/// Window and time zone used for one report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub window: AnalysisWindow,
    pub timezone: ReportTimezone,
}

/// An entry that survived the window filter, with its parsed instant
struct Dated<'a> {
    added_at: DateTime<Utc>,
    entry: &'a PlaylistEntry,
}

/// Derives a [`WrappedReport`] from playlist entries
#[derive(Debug, Clone, Default)]
pub struct WrappedAnalyzer {
    settings: AnalysisSettings,
}

impl WrappedAnalyzer {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Compute the report. `entries` is the full history; everything except New Voices
    /// only looks at entries inside the window.
    pub fn compute(&self, entries: &[PlaylistEntry]) -> WrappedReport {
        log::debug!("Computing metrics for {} entries", entries.len());

        let filtered = self.filter_window(entries);
        log::info!(
            "{} of {} entries fall inside the analysis window",
            filtered.len(),
            entries.len()
        );

        if filtered.is_empty() {
            return WrappedReport::empty();
        }

        let (first_to_party, last_minute_mvp) = self.chronological_extremes(&filtered);

        WrappedReport {
            total_tracks: filtered.len(),
            total_minutes: format_duration(Self::total_minutes(&filtered)),
            top_contributor: Self::top_contributor(&filtered),
            top_artist: Self::top_artist(&filtered),
            first_to_party,
            last_minute_mvp,
            time_analysis: Some(self.time_analysis(&filtered)),
            genre_analysis: Some(Self::genre_analysis(&filtered)),
            popularity_analysis: Some(Self::popularity_analysis(&filtered)),
            decade_analysis: Some(Self::decade_analysis(&filtered)),
            monthly_breakdown: self.monthly_breakdown(&filtered),
            new_voices: self.new_voices(entries, &filtered),
        }
    }

    fn filter_window<'a>(&self, entries: &'a [PlaylistEntry]) -> Vec<Dated<'a>> {
        entries
            .iter()
            .filter_map(|entry| {
                let Some(added_at) = parse_added_at(&entry.added_at, &self.settings.timezone)
                else {
                    log::warn!(
                        "Invalid date '{}' for track '{}', skipping",
                        entry.added_at,
                        entry.track.name
                    );
                    return None;
                };
                self.settings
                    .window
                    .contains(&added_at)
                    .then_some(Dated { added_at, entry })
            })
            .collect()
    }

    /// Total duration in whole minutes, rounded half up
    fn total_minutes(filtered: &[Dated<'_>]) -> u64 {
        let total_ms: u64 = filtered.iter().map(|d| d.entry.track.duration_ms).sum();
        (total_ms + 30_000) / 60_000
    }

    fn top_contributor(filtered: &[Dated<'_>]) -> Leader {
        let mut counts = Tally::new();
        for dated in filtered {
            counts.increment(&dated.entry.added_by.display_name);
        }
        counts.leader("")
    }

    /// Every credited artist on an entry counts once
    fn top_artist(filtered: &[Dated<'_>]) -> Leader {
        let mut counts = Tally::new();
        for artist in filtered.iter().flat_map(|d| &d.entry.track.artists) {
            counts.increment(&artist.name);
        }
        counts.leader("")
    }

    fn chronological_extremes(
        &self,
        filtered: &[Dated<'_>],
    ) -> (Option<Highlight>, Option<Highlight>) {
        let mut sorted: Vec<&Dated<'_>> = filtered.iter().collect();
        sorted.sort_by_key(|dated| dated.added_at);

        let first = sorted.first().map(|dated| self.highlight(dated));
        let last = sorted.last().map(|dated| self.highlight(dated));
        (first, last)
    }

    fn highlight(&self, dated: &Dated<'_>) -> Highlight {
        let track = &dated.entry.track;
        let artist = track.first_artist_name().unwrap_or_else(|| {
            log::debug!("Track '{}' has no artists", track.name);
            UNKNOWN_ARTIST
        });
        Highlight {
            track: track.name.clone(),
            user: dated.entry.added_by.display_name.clone(),
            artist: artist.to_string(),
            date: self
                .settings
                .timezone
                .wall_clock(&dated.added_at)
                .format("%-m/%-d/%Y")
                .to_string(),
        }
    }

    fn time_analysis(&self, filtered: &[Dated<'_>]) -> TimeAnalysis {
        let mut time_of_day_counts = Tally::new();
        let mut weekend_count = 0;
        let mut weekday_count = 0;

        for dated in filtered {
            let wall_clock = self.settings.timezone.wall_clock(&dated.added_at);
            time_of_day_counts.increment(classifier::time_of_day(&wall_clock).label());
            match classifier::day_bucket(&wall_clock) {
                DayBucket::Weekend => weekend_count += 1,
                DayBucket::Weekday => weekday_count += 1,
            }
        }

        let peak = time_of_day_counts.leader("");
        // Ties go to weekdays
        let preferred_days = if weekend_count > weekday_count {
            DayBucket::Weekend
        } else {
            DayBucket::Weekday
        };

        TimeAnalysis {
            peak_time: peak.name,
            peak_time_count: peak.count,
            preferred_days,
            weekend_count,
            weekday_count,
            time_of_day_counts,
        }
    }

    fn monthly_breakdown(&self, filtered: &[Dated<'_>]) -> MonthlyBreakdown {
        let mut month_counts = Tally::new();
        for dated in filtered {
            let wall_clock = self.settings.timezone.wall_clock(&dated.added_at);
            month_counts.increment(classifier::month_abbrev(&wall_clock));
        }

        let peak = month_counts.leader("");
        MonthlyBreakdown {
            peak_month: peak.name,
            peak_month_count: peak.count,
            month_counts,
        }
    }

    fn genre_analysis(filtered: &[Dated<'_>]) -> GenreAnalysis {
        let mut genre_counts = Tally::new();
        let mut genres_by_user: IndexMap<&str, HashSet<&str>> = IndexMap::new();

        for dated in filtered {
            let entry = dated.entry;
            let user_genres = genres_by_user
                .entry(entry.added_by.display_name.as_str())
                .or_default();

            // A genre counts once per entry, however many of its artists carry it
            let mut entry_genres: HashSet<&str> = HashSet::new();
            for genre in entry.track.artists.iter().flat_map(|a| &a.genres) {
                if entry_genres.insert(genre.as_str()) {
                    genre_counts.increment(genre);
                }
                user_genres.insert(genre.as_str());
            }
        }

        let top_genre = genre_counts.leader("Unknown");
        let genre_master = max_by_count(
            genres_by_user
                .iter()
                .map(|(user, genres)| (*user, genres.len())),
            "",
        );

        GenreAnalysis {
            top_genre: top_genre.name,
            top_genre_count: top_genre.count,
            unique_genres: genre_counts.len(),
            genre_master: genre_master.name,
            genre_master_count: genre_master.count,
            genre_counts,
        }
    }

    fn popularity_analysis(filtered: &[Dated<'_>]) -> PopularityAnalysis {
        let rated: Vec<u32> = filtered
            .iter()
            .filter_map(|d| d.entry.track.popularity)
            .filter(|&popularity| popularity > 0)
            .collect();

        let mut underground_tracks = 0;
        let mut mainstream_tracks = 0;
        let mut explorer_counts = Tally::new();
        for dated in filtered {
            let popularity = dated.entry.track.popularity_or_zero();
            if popularity < UNDERGROUND_BELOW {
                underground_tracks += 1;
            }
            if popularity >= MAINSTREAM_FROM {
                mainstream_tracks += 1;
            }
            if popularity < EXPLORER_BELOW {
                explorer_counts.increment(&dated.entry.added_by.display_name);
            }
        }

        let explorer = explorer_counts.leader("");
        PopularityAnalysis {
            avg_popularity: mean_popularity(&rated).round() as u32,
            underground_tracks,
            mainstream_tracks,
            music_explorer: explorer.name,
            explorer_count: explorer.count,
        }
    }

    fn decade_analysis(filtered: &[Dated<'_>]) -> DecadeAnalysis {
        let mut decade_breakdown = Tally::new();
        for dated in filtered {
            decade_breakdown.increment(&classifier::release_decade(
                dated.entry.track.release_date(),
            ));
        }

        let top = decade_breakdown.leader("2020s");
        DecadeAnalysis {
            top_decade: top.name,
            top_decade_count: top.count,
            decade_breakdown,
        }
    }

    /// Contributors whose earliest entry in the whole history lies inside the window
    fn new_voices(&self, entries: &[PlaylistEntry], filtered: &[Dated<'_>]) -> Vec<NewVoice> {
        let mut first_seen: IndexMap<&str, DateTime<Utc>> = IndexMap::new();
        for entry in entries {
            let user_id = entry.added_by.id.as_str();
            if user_id.is_empty() {
                continue;
            }
            let Some(added_at) = parse_added_at(&entry.added_at, &self.settings.timezone) else {
                continue;
            };
            first_seen
                .entry(user_id)
                .and_modify(|earliest| {
                    if added_at < *earliest {
                        *earliest = added_at;
                    }
                })
                .or_insert(added_at);
        }

        first_seen
            .into_iter()
            .filter(|(_, first)| self.settings.window.contains(first))
            .map(|(user_id, first)| {
                let name = filtered
                    .iter()
                    .find(|d| d.entry.added_by.id == user_id)
                    .map(|d| d.entry.added_by.display_name.clone())
                    .unwrap_or_else(|| {
                        log::warn!("No entry in window for new voice '{user_id}'");
                        UNKNOWN_USER.to_string()
                    });
                NewVoice {
                    id: user_id.to_string(),
                    name,
                    first_track_date: first,
                }
            })
            .collect()
    }
}

/// Mean of the rated popularity values, 0 when none are rated
pub(crate) fn mean_popularity(rated: &[u32]) -> f64 {
    if rated.is_empty() {
        return 0.0;
    }
    rated.iter().map(|&p| f64::from(p)).sum::<f64>() / rated.len() as f64
}

/// Compute a report with the default window in the local time zone
pub fn compute(entries: &[PlaylistEntry]) -> WrappedReport {
    WrappedAnalyzer::default().compute(entries)
}
