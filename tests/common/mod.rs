#![allow(dead_code)]

use std::{
    collections::HashMap,
    io,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Form, Json, Router,
    body::{Body, Bytes},
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures_util::{StreamExt, stream};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use tunerelay::{
    config::Settings,
    relay::StreamMode,
    resolver::{MediaResolver, ResolveError},
    server::{self, AppState},
    session::{MemoryStore, SESSION_COOKIE, Session},
    types::MediaEntry,
};

pub const GOOD_CODE: &str = "good-code";
pub const NO_TOKEN_CODE: &str = "no-token-code";
pub const HUGE_EXPIRY_CODE: &str = "huge-expiry-code";
pub const ACCESS_TOKEN: &str = "tok-123";
pub const EXPIRES_IN: i64 = 3600;
pub const MEDIA_BYTES: usize = 3000;
pub const TRUNCATED_AFTER: usize = 2048;
pub const TRUNCATED_BYTE: u8 = 7;

type SearchFn = dyn Fn(&str) -> Result<Vec<MediaEntry>, ResolveError> + Send + Sync;
type MediaFn = dyn Fn(&str) -> Result<String, ResolveError> + Send + Sync;

/// Resolver double that records every query it receives.
pub struct StubResolver {
    search: Box<SearchFn>,
    media: Box<MediaFn>,
    pub queries: Mutex<Vec<String>>,
}

impl StubResolver {
    pub fn new(
        search: impl Fn(&str) -> Result<Vec<MediaEntry>, ResolveError> + Send + Sync + 'static,
        media: impl Fn(&str) -> Result<String, ResolveError> + Send + Sync + 'static,
    ) -> Self {
        StubResolver {
            search: Box::new(search),
            media: Box::new(media),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(ids: &[&str]) -> Self {
        let entries: Vec<MediaEntry> = ids.iter().map(|id| entry(id)).collect();
        Self::new(
            move |_| Ok(entries.clone()),
            |id| Ok(format!("https://media.example/{id}.m4a")),
        )
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaResolver for StubResolver {
    async fn search(&self, query: &str) -> Result<Vec<MediaEntry>, ResolveError> {
        self.queries.lock().unwrap().push(query.to_string());
        (self.search)(query)
    }

    async fn media_url(&self, video_id: &str) -> Result<String, ResolveError> {
        (self.media)(video_id)
    }
}

pub fn entry(id: &str) -> MediaEntry {
    MediaEntry {
        id: id.to_string(),
        title: None,
        url: None,
    }
}

pub fn media_bytes() -> Vec<u8> {
    (0..MEDIA_BYTES).map(|i| (i % 251) as u8).collect()
}

pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Minimal stand-in for the Spotify accounts service, Web API and a media host.
pub fn fake_spotify() -> Router {
    Router::new()
        .route("/api/token", post(token))
        .route("/v1/me/playlists", get(playlists))
        .route("/v1/playlists/{playlist_id}/tracks", get(tracks))
        .route("/media/{file}", get(media))
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    let complete = ["grant_type", "code", "redirect_uri", "client_id", "client_secret"]
        .iter()
        .all(|key| form.contains_key(*key));
    if !complete || form["grant_type"] != "authorization_code" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_request" })),
        )
            .into_response();
    }

    match form["code"].as_str() {
        GOOD_CODE => Json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": EXPIRES_IN,
        }))
        .into_response(),
        NO_TOKEN_CODE => Json(json!({ "token_type": "Bearer" })).into_response(),
        HUGE_EXPIRY_CODE => Json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": i64::MAX,
        }))
        .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid authorization code",
            })),
        )
            .into_response(),
    }
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "message": "Invalid access token" } })),
    )
        .into_response()
}

async fn playlists(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if !bearer_ok(&headers) {
        return unauthorized();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let body: Value = match query.get("offset").map(String::as_str) {
        Some("2") => json!({
            "items": [{ "id": "p3", "name": "Road Trip" }],
            "next": null,
        }),
        _ => json!({
            "items": [
                { "id": "p1", "name": "Road Trip" },
                { "id": "p2", "name": "Focus" },
            ],
            "next": format!("http://{host}/v1/me/playlists?offset=2"),
        }),
    };
    Json(body).into_response()
}

fn item(track: &str, artist: &str) -> Value {
    json!({ "track": { "name": track, "artists": [{ "name": artist }, { "name": "Featured" }] } })
}

async fn tracks(headers: HeaderMap, Path(playlist_id): Path<String>) -> Response {
    if !bearer_ok(&headers) {
        return unauthorized();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    // Paging links that must not be followed
    let next = match playlist_id.as_str() {
        "pl-foreign" => Some("http://tracker.invalid/v1/steal".to_string()),
        "pl-endless" => Some(format!("http://{host}/v1/playlists/pl-endless/tracks")),
        _ => None,
    };
    if let Some(next) = next {
        return Json(json!({ "items": [item("Song A", "Artist A")], "next": next }))
            .into_response();
    }

    let items = match playlist_id.as_str() {
        "pl-ab" => json!([item("Song A", "Artist A"), item("Song B", "Artist B")]),
        "pl-dup" => json!([
            item("Song A", "Artist A"),
            item("Song B", "Artist B"),
            item("Song A", "Artist Z"),
        ]),
        "pl-sparse" => json!([
            { "track": null },
            { "track": { "name": "Lonely", "artists": [] } },
        ]),
        _ => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": { "status": 404, "message": "Resource not found" } })),
            )
                .into_response();
        }
    };

    Json(json!({ "items": items, "next": null })).into_response()
}

async fn media(Path(file): Path<String>) -> Response {
    match file.as_str() {
        "song.mp3" => ([(header::CONTENT_TYPE, "audio/mp4")], media_bytes()).into_response(),
        "truncated.mp3" => {
            // Sends part of the file, then drops the connection
            let head = stream::iter([Ok::<_, io::Error>(Bytes::from(vec![
                TRUNCATED_BYTE;
                TRUNCATED_AFTER
            ]))]);
            let tail = stream::once(async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Err::<Bytes, _>(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "media host went away",
                ))
            });
            ([(header::CONTENT_TYPE, "audio/mp4")], Body::from_stream(head.chain(tail)))
                .into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn settings_for(spotify: SocketAddr, mode: StreamMode) -> Settings {
    Settings {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "http://127.0.0.1/callback".to_string(),
        auth_url: format!("http://{spotify}/authorize"),
        token_url: format!("http://{spotify}/api/token"),
        api_url: format!("http://{spotify}/v1"),
        server_address: "127.0.0.1:0".to_string(),
        session_secret: None,
        stream_mode: mode,
        public_url: None,
        ytdlp_path: "yt-dlp".to_string(),
    }
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub spotify: SocketAddr,
    pub sessions: Arc<MemoryStore>,
    pub resolver: Arc<StubResolver>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn start(mode: StreamMode, resolver: StubResolver) -> Self {
        let spotify = spawn_router(fake_spotify()).await;
        let sessions = Arc::new(MemoryStore::new());
        let resolver = Arc::new(resolver);

        let state = Arc::new(AppState::new(
            settings_for(spotify, mode),
            sessions.clone(),
            resolver.clone(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            server::serve(listener, state).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        TestApp {
            addr,
            spotify,
            sessions,
            resolver,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header(header::COOKIE, format!("{SESSION_COOKIE}={cookie}"))
            .send()
            .await
            .unwrap()
    }

    /// Stores a session directly and returns its cookie value.
    pub async fn login_as(&self, session: Session) -> String {
        use tunerelay::session::SessionStore;
        self.sessions.save(&session).await.unwrap()
    }
}

pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
