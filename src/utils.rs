use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};

/// Characters that are unsafe in file names and removed from search terms.
pub const UNSAFE_FILENAME_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !UNSAFE_FILENAME_CHARS.contains(c))
        .collect()
}

pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

pub fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_session_id() -> String {
    random_alphanumeric(32)
}

pub fn generate_session_secret() -> String {
    random_alphanumeric(64)
}
