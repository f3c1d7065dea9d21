use crate::analytics::{AnalysisSettings, Wrapped};
use crate::models::{PlaylistEntry, PlaylistItemsPage};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use ureq::Agent;

/// Failures that mean the export itself is broken, as opposed to a single odd entry
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {message}")]
    Http { url: String, message: String },

    #[error("playlist export is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("playlist export must be an array of entries or an object with \"items\", found {0}")]
    NotASequence(&'static str),

    #[error("playlist entry #{index} is malformed: {source}")]
    Entry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Something that supplies the complete list of playlist entries
#[cfg_attr(test, mockall::automock)]
pub trait EntrySource {
    fn load_entries(&self) -> Result<Vec<PlaylistEntry>, LoadError>;

    /// Human readable location, used in log messages
    fn describe(&self) -> String;
}

/// Reads a playlist export from a local JSON file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EntrySource for FileSource {
    fn load_entries(&self) -> Result<Vec<PlaylistEntry>, LoadError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_entries(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches a playlist export over HTTP(S)
pub struct HttpSource {
    agent: Agent,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            agent: Agent::new(),
            url: url.into(),
        }
    }
}

impl EntrySource for HttpSource {
    fn load_entries(&self) -> Result<Vec<PlaylistEntry>, LoadError> {
        let http_error = |message: String| LoadError::Http {
            url: self.url.clone(),
            message,
        };

        let response = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|e| http_error(e.to_string()))?;
        let body = response
            .into_string()
            .map_err(|e| http_error(e.to_string()))?;

        parse_entries(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source for a CLI/config location: URLs are fetched, anything else is a file path
pub fn source_for(location: &str) -> Box<dyn EntrySource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

/// Parse an export document: either a bare array of entries or a `{ "items": [...] }` page
pub fn parse_entries(content: &str) -> Result<Vec<PlaylistEntry>, LoadError> {
    let document: Value = serde_json::from_str(content)?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(_) => {
            let page: PlaylistItemsPage = serde_json::from_value(document)
                .map_err(|_| LoadError::NotASequence("an object without \"items\""))?;
            page.items
        }
        Value::Null => return Err(LoadError::NotASequence("null")),
        Value::Bool(_) => return Err(LoadError::NotASequence("a boolean")),
        Value::Number(_) => return Err(LoadError::NotASequence("a number")),
        Value::String(_) => return Err(LoadError::NotASequence("a string")),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| LoadError::Entry { index, source })
        })
        .collect()
}

/// Load every entry from `source` and wrap them in a session for `settings`
pub fn load_wrapped(
    source: &dyn EntrySource,
    settings: AnalysisSettings,
) -> Result<Wrapped, LoadError> {
    log::info!("Loading playlist data from {}", source.describe());
    let entries = source.load_entries()?;
    log::info!("Loaded {} playlist entries", entries.len());
    Ok(Wrapped::new(entries, settings))
}
