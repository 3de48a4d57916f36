use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::{
    api,
    config::Settings,
    info,
    resolver::{MediaResolver, YtDlp},
    session::{CookieStore, MemoryStore, SessionStore},
    utils, warning,
};

/// Everything a handler needs, shared across requests.
pub struct AppState {
    pub settings: Settings,
    pub http: Client,
    pub sessions: Arc<dyn SessionStore>,
    pub resolver: Arc<dyn MediaResolver>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        settings: Settings,
        sessions: Arc<dyn SessionStore>,
        resolver: Arc<dyn MediaResolver>,
    ) -> Self {
        AppState {
            settings,
            http: Client::new(),
            sessions,
            resolver,
        }
    }

    /// Production wiring: signed-cookie sessions (or in-memory ones when
    /// `memory_sessions` is set) and the `yt-dlp` resolver.
    pub fn from_settings(settings: Settings, memory_sessions: bool) -> Self {
        let sessions: Arc<dyn SessionStore> = if memory_sessions {
            Arc::new(MemoryStore::new())
        } else {
            let secret = settings.session_secret.clone().unwrap_or_else(|| {
                warning!("SESSION_SECRET is not set, sessions will not survive a restart");
                utils::generate_session_secret()
            });
            Arc::new(CookieStore::new(secret))
        };
        let resolver = Arc::new(YtDlp::new(settings.ytdlp_path.clone()));

        Self::new(settings, sessions, resolver)
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/playlist", get(api::playlists))
        .route("/playlist/{playlist_id}", get(api::playlist_tracks))
        .route("/stream_audio/{video_id}", get(api::stream_audio))
        .route("/health", get(api::health))
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
}

/// Serves the application on an already bound listener.
pub async fn serve(listener: TcpListener, state: SharedState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

/// Binds the listening socket for `address`, e.g. `127.0.0.1:5000`.
pub async fn bind(address: &str) -> std::io::Result<TcpListener> {
    let addr = SocketAddr::from_str(address)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    Ok(listener)
}
