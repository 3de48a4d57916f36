mod common;

use serde_json::{Value, json};
use tunerelay::{
    error::SpotifyError,
    spotify::{
        auth::{SCOPES, authorize_url},
        catalog::{collapse_tracks, get_playlist_tracks, get_playlists, index_playlists},
    },
    types::{Playlist, PlaylistItem, TrackEntry},
};

fn items(value: Value) -> Vec<PlaylistItem> {
    serde_json::from_value(value).unwrap()
}

fn entry(track: &str, artist: &str) -> TrackEntry {
    TrackEntry {
        track_name: track.to_string(),
        artist_name: artist.to_string(),
    }
}

#[test]
fn test_collapse_tracks_takes_first_artist() {
    let tracks = collapse_tracks(&items(json!([
        { "track": { "name": "Song A", "artists": [{ "name": "Artist A" }, { "name": "Guest" }] } },
        { "track": { "name": "Song B", "artists": [{ "name": "Artist B" }] } },
    ])));

    assert_eq!(tracks, vec![entry("Song A", "Artist A"), entry("Song B", "Artist B")]);
}

#[test]
fn test_collapse_tracks_duplicate_names_last_artist_wins() {
    let tracks = collapse_tracks(&items(json!([
        { "track": { "name": "Intro", "artists": [{ "name": "First" }] } },
        { "track": { "name": "Outro", "artists": [{ "name": "Other" }] } },
        { "track": { "name": "Intro", "artists": [{ "name": "Second" }] } },
    ])));

    // One entry per name, kept at its first position
    assert_eq!(tracks, vec![entry("Intro", "Second"), entry("Outro", "Other")]);
}

#[test]
fn test_collapse_tracks_placeholders() {
    let tracks = collapse_tracks(&items(json!([
        { "track": null },
        { "track": { "artists": [{ "name": "Nameless" }] } },
        { "track": { "name": "Solo", "artists": [] } },
        { "track": { "name": "Ghost", "artists": [{}] } },
        {},
    ])));

    // Every nameless item lands on one "Unknown Track" entry; the last artist wins
    assert_eq!(
        tracks,
        vec![
            entry("Unknown Track", "Unknown Artist"),
            entry("Solo", "Unknown Artist"),
            entry("Ghost", "Unknown Artist"),
        ]
    );
}

#[test]
fn test_index_playlists_serializes_in_listing_order() {
    let playlists: Vec<Playlist> = serde_json::from_value(json!([
        { "id": "1", "name": "Zed" },
        { "id": "2", "name": "Alpha" },
        { "id": "3", "name": "Zed" },
    ]))
    .unwrap();

    let index = index_playlists(playlists);

    assert_eq!(index.len(), 2);
    assert_eq!(index.get("Zed"), Some("3"));
    assert_eq!(index.get("Alpha"), Some("2"));
    assert_eq!(index.get("Missing"), None);
    assert_eq!(
        serde_json::to_string(&index).unwrap(),
        r#"{"Zed":"3","Alpha":"2"}"#
    );
}

#[test]
fn test_authorize_url_encodes_parameters() {
    let settings = tunerelay::config::Settings {
        client_id: "my client".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://localhost:5000/callback".to_string(),
        auth_url: tunerelay::config::DEFAULT_AUTH_URL.to_string(),
        token_url: tunerelay::config::DEFAULT_TOKEN_URL.to_string(),
        api_url: tunerelay::config::DEFAULT_API_URL.to_string(),
        server_address: "127.0.0.1:5000".to_string(),
        session_secret: None,
        stream_mode: Default::default(),
        public_url: None,
        ytdlp_path: "yt-dlp".to_string(),
    };

    let url = authorize_url(&settings).unwrap();

    assert!(url.as_str().starts_with("https://accounts.spotify.com/authorize?"));
    assert!(!url.as_str().contains("secret"));
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("client_id".to_string(), "my client".to_string()),
            ("response_type".to_string(), "code".to_string()),
            ("scope".to_string(), SCOPES.to_string()),
            (
                "redirect_uri".to_string(),
                "http://localhost:5000/callback".to_string()
            ),
            ("show_dialog".to_string(), "true".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_paging_follows_next_on_same_origin() {
    let spotify = common::spawn_router(common::fake_spotify()).await;
    let api_url = format!("http://{spotify}/v1");
    let http = reqwest::Client::new();

    let index = get_playlists(&http, &api_url, common::ACCESS_TOKEN)
        .await
        .unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.get("Road Trip"), Some("p3"));
}

#[tokio::test]
async fn test_paging_refuses_foreign_next_link() {
    let spotify = common::spawn_router(common::fake_spotify()).await;
    let api_url = format!("http://{spotify}/v1");
    let http = reqwest::Client::new();

    let err = get_playlist_tracks(&http, &api_url, common::ACCESS_TOKEN, "pl-foreign")
        .await
        .unwrap_err();

    match err {
        SpotifyError::ForeignPage { what, origin, next } => {
            assert_eq!(what, "tracks");
            assert_eq!(origin, format!("http://{spotify}"));
            assert_eq!(next, "http://tracker.invalid/v1/steal");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_paging_stops_at_page_limit() {
    let spotify = common::spawn_router(common::fake_spotify()).await;
    let api_url = format!("http://{spotify}/v1");
    let http = reqwest::Client::new();

    let err = get_playlist_tracks(&http, &api_url, common::ACCESS_TOKEN, "pl-endless")
        .await
        .unwrap_err();

    assert!(
        matches!(err, SpotifyError::TooManyPages { what: "tracks" }),
        "{err}"
    );
}
