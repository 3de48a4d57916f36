//! # Resolver Module
//!
//! Maps a track/artist pair to an external media id. The search itself is
//! delegated to a [`MediaResolver`]; in production that is [`YtDlp`], in
//! tests any stub implementing the trait.
//!
//! The lookup policy is deliberately plain: strip file-system unsafe
//! characters, search for `"<track> <artist> audio lyrics"`, take the first
//! entry. There is no ranking and no caching, every call searches again.

mod ytdlp;

pub use ytdlp::YtDlp;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::{
    types::{DownloadLink, MediaEntry, TrackEntry, VideoLookup},
    utils, warning,
};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("No results found")]
    NoResults,

    #[error("Failed to run resolver: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Resolver failed: {0}")]
    Failed(String),

    #[error("Cannot parse resolver output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Resolver returned an empty url")]
    EmptyUrl,
}

#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Searches for media matching a free-text query, best match first.
    async fn search(&self, query: &str) -> Result<Vec<MediaEntry>, ResolveError>;

    /// Resolves a media id to a direct, playable audio URL.
    async fn media_url(&self, video_id: &str) -> Result<String, ResolveError>;
}

/// Builds the search query for a track, sanitizing both names first.
pub fn build_query(track_name: &str, artist_name: &str) -> String {
    format!(
        "{} {} audio lyrics",
        utils::sanitize_filename(track_name),
        utils::sanitize_filename(artist_name)
    )
}

/// Looks up the media id for one track.
///
/// Never fails: resolver errors and empty results are reported as
/// [`VideoLookup::Failed`].
pub async fn get_video_url(
    resolver: &dyn MediaResolver,
    track_name: &str,
    artist_name: &str,
) -> VideoLookup {
    let query = build_query(track_name, artist_name);

    match resolver.search(&query).await {
        Ok(entries) => match entries.into_iter().next() {
            Some(entry) => VideoLookup::found(entry.id),
            None => VideoLookup::failed(ResolveError::NoResults),
        },
        Err(e) => {
            warning!("Lookup for '{}' failed: {}", query, e);
            VideoLookup::failed(e)
        }
    }
}

/// Resolves every track in order, one after the other.
///
/// A failing track yields a [`DownloadLink::Failed`] entry and does not stop
/// the remaining lookups. Successful lookups point at
/// `<stream_base>/stream_audio/<video_id>`.
pub async fn resolve_tracks(
    resolver: &dyn MediaResolver,
    tracks: &[TrackEntry],
    stream_base: &Url,
) -> Vec<DownloadLink> {
    let mut links = Vec::with_capacity(tracks.len());

    for entry in tracks {
        let track = entry.track_name.clone();
        let artist = entry.artist_name.clone();

        let link = match get_video_url(resolver, &track, &artist).await {
            VideoLookup::Found { video_id, .. } => match stream_url(stream_base, &video_id) {
                Some(download_url) => DownloadLink::Ready {
                    track,
                    artist,
                    download_url,
                },
                None => DownloadLink::Failed {
                    track,
                    artist,
                    error: format!("Cannot build stream url for {video_id}"),
                },
            },
            VideoLookup::Failed { error } => DownloadLink::Failed {
                track,
                artist,
                error,
            },
        };
        links.push(link);
    }

    links
}

/// Builds the absolute `/stream_audio/<video_id>` URL on `base`.
pub fn stream_url(base: &Url, video_id: &str) -> Option<String> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push("stream_audio")
        .push(video_id);
    Some(url.to_string())
}
