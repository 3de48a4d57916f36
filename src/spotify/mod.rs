//! # Spotify Integration Module
//!
//! Thin client for the two Spotify services this application talks to:
//!
//! ```text
//! API handlers
//!      ↓
//! Spotify Integration Layer
//!     ├── auth     (authorization URL, code for token exchange)
//!     └── catalog  (playlists, playlist tracks)
//!      ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## API Coverage
//!
//! - `GET  {auth_url}` - user authorization page (browser redirect only)
//! - `POST {token_url}` - authorization code exchange
//! - `GET  /me/playlists` - the current user's playlists
//! - `GET  /playlists/{playlist_id}/tracks` - items of one playlist
//!
//! Every call is made once. A non-success status is turned into a
//! [`crate::error::SpotifyError`] that carries the upstream body so the
//! handler can hand it back to the client. Refresh tokens are ignored: an
//! expired token sends the user through the login flow again.

pub mod auth;
pub mod catalog;
