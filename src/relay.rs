//! Delivery of resolved audio to the client.
//!
//! Two modes exist and exactly one is active per server:
//!
//! - [`StreamMode::Redirect`] answers with a `302` to the direct media URL.
//!   Costs no bandwidth, but the URL is signed and short-lived, and the
//!   client talks to the media host directly.
//! - [`StreamMode::Relay`] fetches the media itself and streams it back as
//!   `audio/mpeg` in 1024-byte chunks, pulling the next upstream chunk only
//!   when the client is ready for more.
//!
//! In both modes every setup failure is reported before the response is
//! committed. Once relaying has started, an upstream failure ends the body
//! stream with an error, which aborts the chunked transfer: clients see a
//! truncated download, never JSON mixed into audio bytes.

use std::{fmt, pin::Pin, str::FromStr};

use axum::{
    body::{Body, Bytes},
    http::header,
    response::{IntoResponse, Response},
};
use futures_util::{Stream, StreamExt, stream};
use reqwest::Client;

use crate::{api::found, error::AppError, resolver::MediaResolver, warning};

pub const CHUNK_SIZE: usize = 1024;
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamMode {
    #[default]
    Redirect,
    Relay,
}

impl fmt::Display for StreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StreamMode::Redirect => "redirect",
            StreamMode::Relay => "relay",
        };
        write!(f, "{s}")
    }
}

impl FromStr for StreamMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redirect" => Ok(StreamMode::Redirect),
            "relay" => Ok(StreamMode::Relay),
            other => Err(format!(
                "invalid value '{other}', expected 'redirect' or 'relay'"
            )),
        }
    }
}

pub fn parse_stream_mode(s: &str) -> Result<StreamMode, String> {
    s.parse()
}

/// Serves the audio for `video_id` according to `mode`.
pub async fn stream_audio(
    mode: StreamMode,
    http: &Client,
    resolver: &dyn MediaResolver,
    video_id: &str,
) -> Result<Response, AppError> {
    let media_url = resolver
        .media_url(video_id)
        .await
        .map_err(|e| AppError::Relay(e.to_string()))?;

    match mode {
        StreamMode::Redirect => Ok(found(&media_url)),
        StreamMode::Relay => relay(http, &media_url).await,
    }
}

async fn relay(http: &Client, media_url: &str) -> Result<Response, AppError> {
    let upstream = http
        .get(media_url)
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(|e| AppError::Relay(e.to_string()))?;

    let body = rechunk(upstream.bytes_stream(), CHUNK_SIZE).map(|chunk| {
        chunk.inspect_err(|e| warning!("Audio relay aborted: {}", e))
    });

    Ok((
        [(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)],
        Body::from_stream(body),
    )
        .into_response())
}

/// Re-slices a byte stream into chunks of exactly `size` bytes.
///
/// Only the final chunk may be shorter. The upstream is polled lazily, one
/// chunk at a time, as the consumer asks for more.
pub fn rechunk<S, E>(upstream: S, size: usize) -> impl Stream<Item = Result<Bytes, E>>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    let size = size.max(1);
    let upstream: Pin<Box<S>> = Box::pin(upstream);

    stream::unfold(
        (upstream, Vec::<u8>::with_capacity(size), false),
        move |(mut upstream, mut buffer, done)| async move {
            if done {
                return None;
            }

            while buffer.len() < size {
                match upstream.next().await {
                    Some(Ok(bytes)) => buffer.extend_from_slice(&bytes),
                    Some(Err(e)) => return Some((Err(e), (upstream, Vec::new(), true))),
                    None if buffer.is_empty() => return None,
                    None => {
                        let rest = Bytes::from(std::mem::take(&mut buffer));
                        return Some((Ok(rest), (upstream, buffer, true)));
                    }
                }
            }

            let rest = buffer.split_off(size);
            let chunk = Bytes::from(buffer);
            Some((Ok(chunk), (upstream, rest, false)))
        },
    )
}
