//! Playlist Audio Relay Library
//!
//! This library backs a small web service that signs a user in to Spotify,
//! lists their playlists and tracks, and maps every track to a best-guess
//! audio stream found through an external media resolver (`yt-dlp`).
//!
//! # Modules
//!
//! - `api` - HTTP handlers for login, playlists and audio streaming
//! - `config` - Configuration management and environment variables
//! - `error` - Error types and their HTTP rendering
//! - `relay` - Redirect or relay delivery of resolved audio
//! - `resolver` - Track to media resolution through the external resolver
//! - `server` - Router construction and the HTTP listener
//! - `session` - Session values and pluggable session stores
//! - `spotify` - Spotify accounts and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod config;
pub mod error;
pub mod relay;
pub mod resolver;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Stored session for new login");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used during startup, where no recovery is possible. Request handlers
/// report failures through [`error::AppError`] instead.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, such as an upstream call that failed and is
/// about to be reported back to the client.
///
/// # Example
///
/// ```
/// warning!("Token exchange failed with status {}", status);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
