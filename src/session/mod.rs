//! # Session Module
//!
//! A [`Session`] holds the single bearer token of the current browser and the
//! unix timestamp at which it stops being valid. Handlers never touch global
//! state: they read the session cookie, ask the configured [`SessionStore`] for
//! the matching session and decide from its expiry whether the user must log
//! in again.
//!
//! Two stores are provided:
//!
//! - [`MemoryStore`] keeps sessions in a process-local map keyed by a random
//!   session id. Expired entries are evicted on lookup and pruned on every
//!   save. Handy for tests and single-process development.
//! - [`CookieStore`] keeps nothing on the server. The session is serialized
//!   into the cookie itself and signed with HMAC-SHA256, so a modified cookie
//!   is rejected.
//!
//! Neither store persists anything across restarts.

mod cookie;
mod memory;

pub use cookie::CookieStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SESSION_COOKIE: &str = "tunerelay_session";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot encode session: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid signing key: {0}")]
    Key(String),

    #[error("Invalid cookie value: {0}")]
    Cookie(#[from] axum::http::header::InvalidHeaderValue),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: i64,
}

impl Session {
    /// Builds a session for a token that is valid `expires_in` seconds after `now`.
    ///
    /// `expires_in` comes from the provider; absurd values clamp to the
    /// representable range instead of overflowing.
    pub fn new(access_token: impl Into<String>, now: i64, expires_in: i64) -> Self {
        Session {
            access_token: access_token.into(),
            expires_at: now.saturating_add(expires_in),
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Looks up the session referenced by a cookie value.
    ///
    /// Unknown, malformed or forged values yield `Ok(None)`.
    async fn load(&self, cookie_value: &str) -> Result<Option<Session>, SessionError>;

    /// Stores a session and returns the cookie value that refers to it.
    async fn save(&self, session: &Session) -> Result<String, SessionError>;
}

/// Extracts the session cookie value from request headers.
pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

/// Builds the `Set-Cookie` header value for a stored session.
pub fn set_cookie_header(cookie_value: &str) -> Result<HeaderValue, SessionError> {
    let cookie = format!("{SESSION_COOKIE}={cookie_value}; Path=/; HttpOnly; SameSite=Lax");
    Ok(HeaderValue::from_str(&cookie)?)
}

/// Loads the session for a request, if the browser sent a valid cookie.
pub async fn current_session(
    store: &dyn SessionStore,
    headers: &HeaderMap,
) -> Result<Option<Session>, SessionError> {
    match session_cookie(headers) {
        Some(value) => store.load(value).await,
        None => Ok(None),
    }
}
