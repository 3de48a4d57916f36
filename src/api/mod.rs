//! # API Module
//!
//! HTTP handlers of the playlist audio relay.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`index`] - `GET /` sends the browser to `/login`
//! - [`login`] - `GET /login` redirects to Spotify's authorization page
//! - [`callback`] - `GET /callback` exchanges the returned code for a token and
//!   stores it in the session
//!
//! ### Catalog
//!
//! - [`playlists`] - `GET /playlist` maps playlist names to ids
//! - [`playlist_tracks`] - `GET /playlist/{playlist_id}` lists each track with
//!   a download URL or the reason none was found
//!
//! ### Audio
//!
//! - [`stream_audio`] - `GET /stream_audio/{video_id}` redirects to or relays
//!   the resolved audio
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health` returns application status and version
//!
//! Catalog endpoints need a live session. Without one, or with an expired
//! token, they answer `302 /login` instead of an error payload.

mod auth;
mod health;
mod playlist;
mod stream;

pub use auth::{callback, index, login};
pub use health::health;
pub use playlist::{playlist_tracks, playlists};
pub use stream::stream_audio;

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use url::Url;

use crate::{
    error::AppError,
    server::AppState,
    session::{self, Session},
    utils,
};

pub const LOGIN_PATH: &str = "/login";
pub const PLAYLIST_PATH: &str = "/playlist";

/// Builds a `302 Found` response pointing at `location`.
pub fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "Invalid redirect location" })),
        )
            .into_response(),
    }
}

/// Returns the request's session if it exists and has not expired.
async fn authorized(state: &AppState, headers: &HeaderMap) -> Result<Option<Session>, AppError> {
    let session = session::current_session(state.sessions.as_ref(), headers).await?;
    let now = utils::now_timestamp();
    Ok(session.filter(|s| !s.is_expired_at(now)))
}

/// Base URL for links handed back to the client.
fn public_base(state: &AppState, headers: &HeaderMap) -> Result<Url, AppError> {
    if let Some(base) = &state.settings.public_url {
        return Ok(Url::parse(base)?);
    }

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::DownloadUrl("missing Host header".to_string()))?;
    Ok(Url::parse(&format!("http://{host}/"))?)
}
