use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

pub const UNKNOWN_TRACK: &str = "Unknown Track";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackObject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistObject {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub name: String,
    pub id: String,
}

/// Playlists keyed by name, serialized as a JSON object in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistIndex(pub Vec<PlaylistRef>);

impl PlaylistIndex {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|playlist| playlist.name == name)
            .map(|playlist| playlist.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PlaylistIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for playlist in &self.0 {
            map.serialize_entry(&playlist.name, &playlist.id)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
    pub track_name: String,
    pub artist_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DownloadLink {
    Ready {
        track: String,
        artist: String,
        download_url: String,
    },
    Failed {
        track: String,
        artist: String,
        error: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStatus {
    Success,
}

/// Outcome of resolving one track against the media resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VideoLookup {
    Found {
        status: LookupStatus,
        video_id: String,
    },
    Failed {
        error: String,
    },
}

impl VideoLookup {
    pub fn found(video_id: impl Into<String>) -> Self {
        VideoLookup::Found {
            status: LookupStatus::Success,
            video_id: video_id.into(),
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        VideoLookup::Failed {
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub entries: Option<Vec<MediaEntry>>,
}
