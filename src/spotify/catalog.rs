use std::collections::HashMap;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::{SpotifyError, upstream_details},
    types::{
        Paged, Playlist, PlaylistIndex, PlaylistItem, PlaylistRef, TrackEntry, UNKNOWN_ARTIST,
        UNKNOWN_TRACK,
    },
};

/// Upper bound on the pages read for a single listing.
pub const MAX_PAGES: usize = 200;

/// Lists the current user's playlists as a name to id index.
///
/// Follows the `next` links until every page has been read, at most
/// [`MAX_PAGES`] of them, and only while they stay on the origin of `api_url`.
///
/// # Errors
///
/// Returns [`SpotifyError::Catalog`] with the upstream body when Spotify
/// answers with a non-success status, [`SpotifyError::ForeignPage`] or
/// [`SpotifyError::TooManyPages`] when paging misbehaves.
pub async fn get_playlists(
    http: &Client,
    api_url: &str,
    token: &str,
) -> Result<PlaylistIndex, SpotifyError> {
    let url = endpoint(api_url, &["me", "playlists"])?;
    let playlists: Vec<Playlist> = fetch_all(http, url, token, "playlists").await?;
    Ok(index_playlists(playlists))
}

/// Lists the tracks of one playlist as track/artist pairs.
///
/// Tracks are keyed by name, see [`collapse_tracks`].
pub async fn get_playlist_tracks(
    http: &Client,
    api_url: &str,
    token: &str,
    playlist_id: &str,
) -> Result<Vec<TrackEntry>, SpotifyError> {
    let url = endpoint(api_url, &["playlists", playlist_id, "tracks"])?;
    let items: Vec<PlaylistItem> = fetch_all(http, url, token, "tracks").await?;
    Ok(collapse_tracks(&items))
}

/// Builds the name to id index, keeping the first position of a name and the
/// last id seen for it.
pub fn index_playlists(playlists: Vec<Playlist>) -> PlaylistIndex {
    let mut index: Vec<PlaylistRef> = Vec::with_capacity(playlists.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for playlist in playlists {
        match positions.get(&playlist.name) {
            Some(&pos) => index[pos].id = playlist.id,
            None => {
                positions.insert(playlist.name.clone(), index.len());
                index.push(PlaylistRef {
                    name: playlist.name,
                    id: playlist.id,
                });
            }
        }
    }

    PlaylistIndex(index)
}

/// Reduces playlist items to one entry per distinct track name.
///
/// Only the first listed artist is kept. Missing names fall back to
/// "Unknown Track" / "Unknown Artist". Two items with the same track name
/// collapse into one entry at the position of the first, carrying the artist
/// of the last.
pub fn collapse_tracks(items: &[PlaylistItem]) -> Vec<TrackEntry> {
    let mut tracks: Vec<TrackEntry> = Vec::with_capacity(items.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for item in items {
        let track = item.track.as_ref();
        let track_name = track
            .and_then(|t| t.name.clone())
            .unwrap_or_else(|| UNKNOWN_TRACK.to_string());
        let artist_name = track
            .and_then(|t| t.artists.first())
            .and_then(|a| a.name.clone())
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

        match positions.get(&track_name) {
            Some(&pos) => tracks[pos].artist_name = artist_name,
            None => {
                positions.insert(track_name.clone(), tracks.len());
                tracks.push(TrackEntry {
                    track_name,
                    artist_name,
                });
            }
        }
    }

    tracks
}

fn endpoint(api_url: &str, segments: &[&str]) -> Result<Url, SpotifyError> {
    let mut url = Url::parse(api_url).map_err(|e| SpotifyError::Url(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| SpotifyError::Url(api_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn fetch_all<T: DeserializeOwned>(
    http: &Client,
    first: Url,
    token: &str,
    what: &'static str,
) -> Result<Vec<T>, SpotifyError> {
    let origin = first.origin();
    let mut items = Vec::new();
    let mut next = Some(first);
    let mut pages = 0;

    while let Some(url) = next {
        if pages == MAX_PAGES {
            return Err(SpotifyError::TooManyPages { what });
        }
        pages += 1;

        let res = http.get(url).bearer_auth(token).send().await?;
        let status = res.status();

        if !status.is_success() {
            let details = upstream_details(res).await;
            return Err(SpotifyError::Catalog {
                what,
                status,
                details,
            });
        }

        let page = res.json::<Paged<T>>().await?;
        items.extend(page.items);

        // The bearer token only ever goes back to the API it came from
        next = match page.next {
            Some(link) => {
                let url = Url::parse(&link).map_err(|e| SpotifyError::Url(e.to_string()))?;
                if url.origin() != origin {
                    return Err(SpotifyError::ForeignPage {
                        what,
                        origin: origin.ascii_serialization(),
                        next: link,
                    });
                }
                Some(url)
            }
            None => None,
        };
    }

    Ok(items)
}
