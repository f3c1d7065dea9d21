use serde::{Deserialize, Deserializer, Serialize};

/// Read an explicit JSON `null` the same way as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One playlist-add event as found in the playlist export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Raw timestamp, usually RFC 3339. Parsed lazily so that a bad value only drops this entry.
    /// Missing or null becomes an empty string, which never parses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub added_at: String,
    pub added_by: AddedBy,
    pub track: Track,
}

/// The contributor who added an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedBy {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: Option<u32>, // 0-100, absent for local files
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Option<Album>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub release_date: Option<String>, // year-prefixed, e.g. "1994" or "1994-03-01"
}

/// Paged export shape returned by the Spotify playlist items endpoint
#[derive(Debug, Deserialize)]
pub struct PlaylistItemsPage {
    pub items: Vec<serde_json::Value>,
}

impl Track {
    /// Popularity with an absent value treated as zero
    pub fn popularity_or_zero(&self) -> u32 {
        self.popularity.unwrap_or(0)
    }

    /// Name of the first credited artist, if any
    pub fn first_artist_name(&self) -> Option<&str> {
        self.artists.first().map(|artist| artist.name.as_str())
    }

    pub fn release_date(&self) -> Option<&str> {
        self.album
            .as_ref()
            .and_then(|album| album.release_date.as_deref())
    }
}
