use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::{
    config::Settings,
    error::{SpotifyError, upstream_details},
    session::Session,
    types::TokenResponse,
    utils,
};

/// Permissions requested from the user.
pub const SCOPES: &str = "user-read-private user-read-email playlist-read-private";

/// Fallback lifetime when the token response omits `expires_in`.
pub const DEFAULT_EXPIRES_IN: i64 = 3600;

/// Builds the Spotify authorization URL the browser is sent to on login.
///
/// The consent dialog is always shown (`show_dialog=true`) so that a user can
/// switch accounts after their token expired.
///
/// # Example
///
/// ```
/// let url = authorize_url(&settings)?;
/// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
/// ```
pub fn authorize_url(settings: &Settings) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &settings.auth_url,
        &[
            ("client_id", settings.client_id.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("show_dialog", "true"),
        ],
    )
}

/// Exchanges an authorization code for an access token.
///
/// Sends the code together with the client credentials to the token endpoint
/// and turns a usable answer into a [`Session`] whose expiry is the time of
/// the exchange plus the lifetime reported by Spotify.
///
/// # Errors
///
/// - [`SpotifyError::TokenExchange`] if Spotify answers with a non-success status
/// - [`SpotifyError::MissingAccessToken`] if the answer has no `access_token`
/// - [`SpotifyError::Http`] for network failures
///
/// The exchange is attempted exactly once.
pub async fn exchange_code(
    http: &Client,
    settings: &Settings,
    code: &str,
) -> Result<Session, SpotifyError> {
    let res = http
        .post(&settings.token_url)
        .form(&[
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
        ])
        .send()
        .await?;

    let status = res.status();
    let details = upstream_details(res).await;

    if !status.is_success() {
        return Err(SpotifyError::TokenExchange { status, details });
    }

    match token_from(&details) {
        Some((access_token, expires_in)) => Ok(Session::new(
            access_token,
            utils::now_timestamp(),
            expires_in,
        )),
        None => Err(SpotifyError::MissingAccessToken { details }),
    }
}

fn token_from(details: &Value) -> Option<(String, i64)> {
    let token: TokenResponse = serde_json::from_value(details.clone()).ok()?;
    let access_token = token.access_token?;
    Some((access_token, token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN)))
}
