use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{AudioSource, MediaExtractor};
use crate::Result;

/// Passes through URLs that already point at an audio or video file
pub struct DirectExtractor {
    client: Client,
}

impl DirectExtractor {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Check if URL points to an audio or video file
    fn is_media_url(url: &Url) -> bool {
        let path = url.path().to_lowercase();

        let media_extensions = [
            ".mp3", ".m4a", ".wav", ".flac", ".ogg", ".aac",
            ".mp4", ".avi", ".mov", ".mkv", ".webm", ".m4v",
        ];

        media_extensions.iter().any(|ext| path.ends_with(ext))
    }

    /// File size via HEAD request; servers that refuse HEAD just report nothing
    async fn content_length(&self, url: &str) -> Option<u64> {
        let response = match self.client.head(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!("HEAD {} returned HTTP {}", url, response.status());
                return None;
            }
            Err(e) => {
                tracing::debug!("HEAD {} failed: {}", url, e);
                return None;
            }
        };

        response
            .headers()
            .get("content-length")
            .and_then(|cl| cl.to_str().ok())
            .and_then(|cl| cl.parse::<u64>().ok())
    }
}

/// Human readable title from the last path segment
fn title_from_url(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|filename| !filename.is_empty())
        .map(|filename| {
            // Remove extension and decode URL encoding
            let name = match filename.rfind('.') {
                Some(dot_pos) => &filename[..dot_pos],
                None => filename,
            };
            urlencoding::decode(name)
                .unwrap_or_else(|_| name.into())
                .replace(['_', '-'], " ")
        })
}

#[async_trait]
impl MediaExtractor for DirectExtractor {
    async fn resolve_audio(&self, url: &str) -> Result<AudioSource> {
        let parsed_url = Url::parse(url)
            .map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;

        Ok(AudioSource {
            stream_url: url.to_string(),
            original_url: url.to_string(),
            platform: self.platform_name().to_string(),
            title: title_from_url(&parsed_url),
            file_size: self.content_length(url).await,
        })
    }

    fn supports_url(&self, url: &str) -> bool {
        Url::parse(url)
            .map(|parsed| Self::is_media_url(&parsed))
            .unwrap_or(false)
    }

    fn platform_name(&self) -> &'static str {
        "Direct URL"
    }
}

impl Default for DirectExtractor {
    fn default() -> Self {
        Self::new()
    }
}
