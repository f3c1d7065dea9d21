use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use playlist_wrapped::analytics::{ReportTimezone, WrappedReport};
use playlist_wrapped::config::{DEFAULT_SOURCE, checked_window, load_config, parse_instant};
use playlist_wrapped::loader::{load_wrapped, source_for};

#[derive(Parser)]
#[command(name = "playlist-wrapped")]
#[command(about = "Yearly Wrapped statistics for a collaborative playlist export")]
#[command(version)]
struct Args {
    /// Path or http(s) URL of the playlist export (overrides WRAPPED_SOURCE)
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Print the report as JSON instead of text slides
    #[arg(long = "json")]
    json: bool,

    /// Window start as RFC 3339 (overrides WRAPPED_WINDOW_START)
    #[arg(long = "from")]
    from: Option<String>,

    /// Window end as RFC 3339, inclusive (overrides WRAPPED_WINDOW_END)
    #[arg(long = "to")]
    to: Option<String>,

    /// Time zone for hours, weekdays and months: local, UTC or an offset like +02:00
    #[arg(long = "timezone")]
    timezone: Option<String>,

    /// Quiet mode - only log warnings and errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn init_logger(args: &Args) {
    let level = if args.debug {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args);

    // Load configuration from .env, command line flags take precedence
    let mut config = load_config()?;
    if let Some(raw) = &args.timezone {
        config.settings.timezone = raw.parse::<ReportTimezone>().context("--timezone")?;
    }
    if args.from.is_some() || args.to.is_some() {
        let start = match &args.from {
            Some(raw) => parse_instant(raw).context("--from")?,
            None => config.settings.window.start,
        };
        let end = match &args.to {
            Some(raw) => parse_instant(raw).context("--to")?,
            None => config.settings.window.end,
        };
        config.settings.window = checked_window(start, end)?;
    }

    let location = args
        .input
        .or(config.source)
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    let source = source_for(&location);
    let wrapped = load_wrapped(&*source, config.settings)
        .with_context(|| format!("Failed to load playlist data from '{location}'"))?;

    let report = wrapped.report();
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_slides(report);
    }

    Ok(())
}

fn print_slides(report: &WrappedReport) {
    println!("\n=== OUR PLAYLIST WRAPPED ===");

    if report.is_empty() {
        println!("No tracks were added during this period.");
        return;
    }

    println!("\n🎵 {} tracks added", report.total_tracks);
    println!("⏱️  {} of music", report.total_minutes);
    println!(
        "🏆 Top contributor: {} ({} tracks)",
        report.top_contributor.name, report.top_contributor.count
    );
    println!(
        "🎤 Top artist: {} ({} tracks)",
        report.top_artist.name, report.top_artist.count
    );

    let voice_word = if report.new_voices.len() == 1 {
        "person"
    } else {
        "people"
    };
    println!(
        "\n✨ {} {} discovered our playlist for the first time",
        report.new_voices.len(),
        voice_word
    );
    for voice in report.new_voices.iter().take(15) {
        println!("   - {}", voice.name);
    }
    if report.new_voices.len() > 15 {
        println!("   ... and {} more", report.new_voices.len() - 15);
    }

    if let Some(genres) = &report.genre_analysis {
        println!("\n🎸 Genres");
        println!(
            "   Top genre: {} ({} tracks) | {} unique genres",
            genres.top_genre, genres.top_genre_count, genres.unique_genres
        );
        if !genres.genre_master.is_empty() {
            println!(
                "   Genre master: {} ({} genres)",
                genres.genre_master, genres.genre_master_count
            );
        }
    }

    if let Some(time) = &report.time_analysis {
        println!("\n🕒 When we add music");
        println!("   Peak time: {} ({} tracks)", time.peak_time, time.peak_time_count);
        println!(
            "   {} person: {} weekend / {} weekday tracks",
            time.preferred_days, time.weekend_count, time.weekday_count
        );
    }

    if let Some(popularity) = &report.popularity_analysis {
        println!("\n📈 Popularity");
        println!(
            "   Average popularity: {}/100 | Underground: {} | Mainstream: {}",
            popularity.avg_popularity, popularity.underground_tracks, popularity.mainstream_tracks
        );
        if !popularity.music_explorer.is_empty() {
            println!(
                "   Music explorer: {} ({} hidden gems)",
                popularity.music_explorer, popularity.explorer_count
            );
        }
    }

    if let Some(decades) = &report.decade_analysis {
        println!("\n📀 Decades");
        println!(
            "   Top decade: {} ({} tracks)",
            decades.top_decade, decades.top_decade_count
        );
        let breakdown: Vec<String> = decades
            .decade_breakdown
            .iter()
            .map(|(decade, count)| format!("{decade} ({count})"))
            .collect();
        println!("   {}", breakdown.join(", "));
    }

    let months = &report.monthly_breakdown;
    println!("\n📅 Months");
    println!(
        "   Peak month: {} ({} tracks)",
        months.peak_month, months.peak_month_count
    );
    let trend: Vec<String> = months
        .month_counts
        .iter()
        .map(|(month, count)| format!("{month} {count}"))
        .collect();
    println!("   {}", trend.join(" | "));

    println!("\n🥇 Awards");
    if let Some(first) = &report.first_to_party {
        println!(
            "   First to the party: {} with \"{}\" by {} on {}",
            first.user, first.track, first.artist, first.date
        );
    }
    if let Some(last) = &report.last_minute_mvp {
        println!(
            "   Last minute MVP: {} with \"{}\" by {} on {}",
            last.user, last.track, last.artist, last.date
        );
    }
}
