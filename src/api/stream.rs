use axum::{Extension, extract::Path, response::Response};

use crate::{error::AppError, info, relay, server::SharedState, warning};

pub async fn stream_audio(
    Path(video_id): Path<String>,
    Extension(state): Extension<SharedState>,
) -> Result<Response, AppError> {
    info!("Streaming {} ({})", video_id, state.settings.stream_mode);

    relay::stream_audio(
        state.settings.stream_mode,
        &state.http,
        state.resolver.as_ref(),
        &video_id,
    )
    .await
    .inspect_err(|e| warning!("Stream for {} failed: {}", video_id, e))
}
