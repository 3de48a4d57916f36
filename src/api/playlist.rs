use axum::{
    Extension, Json,
    extract::Path,
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use super::{LOGIN_PATH, authorized, found, public_base};
use crate::{error::AppError, info, resolver, server::SharedState, spotify, warning};

pub async fn playlists(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(session) = authorized(&state, &headers).await? else {
        return Ok(found(LOGIN_PATH));
    };

    let index =
        spotify::catalog::get_playlists(&state.http, &state.settings.api_url, &session.access_token)
            .await
            .inspect_err(|e| warning!("Playlist listing failed: {}", e))?;

    info!("Listed {} playlists", index.len());
    Ok(Json(index).into_response())
}

pub async fn playlist_tracks(
    Path(playlist_id): Path<String>,
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(session) = authorized(&state, &headers).await? else {
        return Ok(found(LOGIN_PATH));
    };

    let tracks = spotify::catalog::get_playlist_tracks(
        &state.http,
        &state.settings.api_url,
        &session.access_token,
        &playlist_id,
    )
    .await
    .inspect_err(|e| warning!("Track listing for {} failed: {}", playlist_id, e))?;

    let base = public_base(&state, &headers)?;
    info!(
        "Resolving {} tracks of playlist {}",
        tracks.len(),
        playlist_id
    );
    let links = resolver::resolve_tracks(state.resolver.as_ref(), &tracks, &base).await;

    Ok(Json(links).into_response())
}
