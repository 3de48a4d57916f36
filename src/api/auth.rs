use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    http::header,
    response::Response,
};

use super::{LOGIN_PATH, PLAYLIST_PATH, found};
use crate::{
    error::AppError,
    server::SharedState,
    session::set_cookie_header,
    spotify, success, warning,
};

pub async fn index() -> Response {
    found(LOGIN_PATH)
}

pub async fn login(Extension(state): Extension<SharedState>) -> Result<Response, AppError> {
    let url = spotify::auth::authorize_url(&state.settings)?;
    Ok(found(url.as_str()))
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<SharedState>,
) -> Result<Response, AppError> {
    if let Some(error) = params.get("error") {
        warning!("Authorization was refused: {}", error);
        return Err(AppError::Denied(error.clone()));
    }

    let Some(code) = params.get("code") else {
        return Err(AppError::MissingCode);
    };

    let session = spotify::auth::exchange_code(&state.http, &state.settings, code)
        .await
        .inspect_err(|e| warning!("Token exchange failed: {}", e))?;

    let cookie = state.sessions.save(&session).await?;
    let mut response = found(PLAYLIST_PATH);
    response
        .headers_mut()
        .insert(header::SET_COOKIE, set_cookie_header(&cookie)?);

    success!("Login completed, token valid until {}", session.expires_at);
    Ok(response)
}
