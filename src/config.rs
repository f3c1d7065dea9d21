use crate::analytics::{AnalysisSettings, AnalysisWindow, ReportTimezone};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

pub const DEFAULT_SOURCE: &str = "enhanced-playlist-data.json";

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub source: Option<String>,
    pub settings: AnalysisSettings,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    config_from_lookup(|key| std::env::var(key).ok())
}

/// Build configuration from a variable lookup, treating blank values as unset
pub fn config_from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let timezone = match get("WRAPPED_TIMEZONE") {
        Some(raw) => raw
            .parse::<ReportTimezone>()
            .context("WRAPPED_TIMEZONE")?,
        None => ReportTimezone::default(),
    };

    let defaults = AnalysisWindow::default();
    let start = match get("WRAPPED_WINDOW_START") {
        Some(raw) => parse_instant(&raw).context("WRAPPED_WINDOW_START")?,
        None => defaults.start,
    };
    let end = match get("WRAPPED_WINDOW_END") {
        Some(raw) => parse_instant(&raw).context("WRAPPED_WINDOW_END")?,
        None => defaults.end,
    };

    Ok(Config {
        source: get("WRAPPED_SOURCE"),
        settings: AnalysisSettings {
            window: checked_window(start, end)?,
            timezone,
        },
    })
}

/// Parse an RFC 3339 window bound
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("'{raw}' is not an RFC 3339 timestamp"))
}

pub fn checked_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<AnalysisWindow> {
    if start > end {
        bail!("analysis window starts ({start}) after it ends ({end})");
    }
    Ok(AnalysisWindow::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.source, None);
        assert_eq!(config.settings, AnalysisSettings::default());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = config_from_lookup(lookup_from(&[
            ("WRAPPED_SOURCE", "https://example.test/export.json"),
            ("WRAPPED_TIMEZONE", "UTC"),
            ("WRAPPED_WINDOW_START", "2024-01-01T00:00:00Z"),
            ("WRAPPED_WINDOW_END", "2024-12-31T23:59:59+00:00"),
        ]))
        .unwrap();

        assert_eq!(
            config.source.as_deref(),
            Some("https://example.test/export.json")
        );
        assert_eq!(config.settings.timezone, ReportTimezone::utc());
        assert_eq!(
            config.settings.window.start,
            parse_instant("2024-01-01T00:00:00Z").unwrap()
        );
        assert_eq!(
            config.settings.window.end.to_rfc3339(),
            "2024-12-31T23:59:59+00:00"
        );
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config =
            config_from_lookup(lookup_from(&[("WRAPPED_SOURCE", "  "), ("WRAPPED_TIMEZONE", "")]))
                .unwrap();
        assert_eq!(config.source, None);
        assert_eq!(config.settings.timezone, ReportTimezone::Local);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from_lookup(lookup_from(&[("WRAPPED_TIMEZONE", "Mars/Olympus")])).is_err());
        assert!(config_from_lookup(lookup_from(&[("WRAPPED_WINDOW_START", "March")])).is_err());
        assert!(
            config_from_lookup(lookup_from(&[
                ("WRAPPED_WINDOW_START", "2025-06-01T00:00:00Z"),
                ("WRAPPED_WINDOW_END", "2025-05-01T00:00:00Z"),
            ]))
            .is_err()
        );
    }
}
