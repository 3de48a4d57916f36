use async_trait::async_trait;
use tokio::process::Command;

use super::{MediaResolver, ResolveError};
use crate::types::{MediaEntry, SearchResult};

const AUDIO_FORMAT: &str = "bestaudio/best";

/// [`MediaResolver`] backed by the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: String,
}

impl YtDlp {
    pub fn new(binary: impl Into<String>) -> Self {
        YtDlp {
            binary: binary.into(),
        }
    }

    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={video_id}")
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, ResolveError> {
        let out = Command::new(&self.binary)
            .args(["-f", AUDIO_FORMAT, "--quiet", "--no-warnings"])
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(ResolveError::Failed(stderr.trim().to_string()));
        }

        Ok(out.stdout)
    }
}

#[async_trait]
impl MediaResolver for YtDlp {
    async fn search(&self, query: &str) -> Result<Vec<MediaEntry>, ResolveError> {
        let target = format!("ytsearch:{query}");
        let stdout = self
            .run(&["--flat-playlist", "--dump-single-json", target.as_str()])
            .await?;

        let result: SearchResult = serde_json::from_slice(&stdout)?;
        Ok(result.entries.unwrap_or_default())
    }

    async fn media_url(&self, video_id: &str) -> Result<String, ResolveError> {
        let target = Self::watch_url(video_id);
        let stdout = self.run(&["--no-playlist", "--get-url", target.as_str()]).await?;

        String::from_utf8_lossy(&stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or(ResolveError::EmptyUrl)
    }
}
