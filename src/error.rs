//! Error types surfaced to HTTP clients.
//!
//! Every failure a handler can hit ends up as an [`AppError`], which renders
//! as a JSON object with an `error` field and, when the provider sent one, the
//! upstream payload under `details`. Missing or expired sessions are not
//! errors; handlers answer those with a redirect to `/login`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::session::SessionError;

#[derive(Error, Debug)]
pub enum SpotifyError {
    #[error("Failed to get token")]
    TokenExchange { status: StatusCode, details: Value },

    #[error("No access token found")]
    MissingAccessToken { details: Value },

    #[error("Failed to fetch {what}")]
    Catalog {
        what: &'static str,
        status: StatusCode,
        details: Value,
    },

    #[error("Refusing to follow {what} page outside {origin}: {next}")]
    ForeignPage {
        what: &'static str,
        origin: String,
        next: String,
    },

    #[error("Too many pages while fetching {what}")]
    TooManyPages { what: &'static str },

    #[error("Spotify request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid Spotify url: {0}")]
    Url(String),
}

impl SpotifyError {
    pub fn details(&self) -> Option<&Value> {
        match self {
            SpotifyError::TokenExchange { details, .. }
            | SpotifyError::MissingAccessToken { details }
            | SpotifyError::Catalog { details, .. } => Some(details),
            SpotifyError::ForeignPage { .. }
            | SpotifyError::TooManyPages { .. }
            | SpotifyError::Http(_)
            | SpotifyError::Url(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// The provider redirected back with an `error` parameter.
    #[error("{0}")]
    Denied(String),

    #[error("Missing authorization code")]
    MissingCode,

    #[error(transparent)]
    Spotify(#[from] SpotifyError),

    #[error("{0}")]
    Relay(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Cannot build download url: {0}")]
    DownloadUrl(String),

    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Denied(_) => StatusCode::OK,
            AppError::MissingCode => StatusCode::BAD_REQUEST,
            AppError::Spotify(_) | AppError::Relay(_) => StatusCode::BAD_GATEWAY,
            AppError::Session(_) | AppError::DownloadUrl(_) | AppError::InvalidUrl(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> Value {
        let details = match self {
            AppError::Spotify(e) => e.details().cloned(),
            _ => None,
        };

        match details {
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Reads a provider response body as JSON, keeping non-JSON text as a string.
pub async fn upstream_details(response: reqwest::Response) -> Value {
    match response.text().await {
        Ok(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        Err(e) => Value::String(e.to_string()),
    }
}
