//! Configuration management for the playlist audio relay.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Spotify credentials are required;
//! everything else falls back to a sensible default.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf};
use thiserror::Error;

use crate::relay::StreamMode;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Cannot prepare configuration directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads environment variables from `.env` files.
///
/// Looks first in the platform-specific local data directory under
/// `tunerelay/.env`, then in the current working directory. Variables that
/// are already set in the process environment are never overwritten, and a
/// missing file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/tunerelay/.env`
/// - macOS: `~/Library/Application Support/tunerelay/.env`
/// - Windows: `%LOCALAPPDATA%/tunerelay/.env`
///
/// # Errors
///
/// Returns an error only if the data directory cannot be created.
pub async fn load_env() -> Result<(), ConfigError> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunerelay/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        let _ = dotenv::from_path(&path);
    }
    let _ = dotenv::dotenv();
    Ok(())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Returns the Spotify application client ID (`SPOTIFY_CLIENT_ID`).
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify application client secret (`SPOTIFY_CLIENT_SECRET`).
///
/// The secret is only ever sent to the token endpoint and must never be logged.
pub fn spotify_client_secret() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_SECRET")
}

/// Returns the OAuth redirect URI (`SPOTIFY_REDIRECT_URI`).
///
/// This must match the redirect URI registered in the Spotify application
/// settings and point at this server's `/callback` route.
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIFY_REDIRECT_URI")
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    optional("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string())
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string())
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Returns the address the HTTP server binds to, e.g. `127.0.0.1:5000`.
pub fn server_addr() -> String {
    optional("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Returns the HMAC key for signed session cookies, if one is configured.
pub fn session_secret() -> Option<String> {
    optional("SESSION_SECRET")
}

/// Returns the configured audio delivery mode (`STREAM_MODE`).
pub fn stream_mode() -> Result<StreamMode, ConfigError> {
    match optional("STREAM_MODE") {
        Some(value) => value.parse().map_err(|reason| ConfigError::Invalid {
            name: "STREAM_MODE",
            reason,
        }),
        None => Ok(StreamMode::default()),
    }
}

/// Returns the public base URL used for generated download links.
pub fn public_url() -> Option<String> {
    optional("PUBLIC_URL")
}

/// Returns the path of the `yt-dlp` executable.
pub fn ytdlp_path() -> String {
    optional("YTDLP_PATH").unwrap_or_else(|| DEFAULT_YTDLP_PATH.to_string())
}

/// Runtime settings for the whole service.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_address: String,
    pub session_secret: Option<String>,
    pub stream_mode: StreamMode,
    pub public_url: Option<String>,
    pub ytdlp_path: String,
}

impl Settings {
    /// Collects every setting from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Settings {
            client_id: spotify_client_id()?,
            client_secret: spotify_client_secret()?,
            redirect_uri: spotify_redirect_uri()?,
            auth_url: spotify_apiauth_url(),
            token_url: spotify_apitoken_url(),
            api_url: spotify_apiurl(),
            server_address: server_addr(),
            session_secret: session_secret(),
            stream_mode: stream_mode()?,
            public_url: public_url(),
            ytdlp_path: ytdlp_path(),
        })
    }
}
