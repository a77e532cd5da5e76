use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

pub mod direct;
pub mod ytdlp;

use crate::config::ExtractorConfig;
use crate::{InsightError, Result};

/// A directly streamable audio location resolved from a video URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSource {
    /// URL the audio bytes can be fetched from
    pub stream_url: String,

    /// URL the user asked for
    pub original_url: String,

    /// Name of the extractor that resolved it
    pub platform: String,

    /// Title or file name of the media, when known
    pub title: Option<String>,

    /// Size in bytes, when the server reports it
    pub file_size: Option<u64>,
}

/// Trait for resolving a streamable audio URL from a page or media URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Resolve the direct audio stream for a URL
    async fn resolve_audio(&self, url: &str) -> Result<AudioSource>;

    /// Check if this extractor supports the given URL
    fn supports_url(&self, url: &str) -> bool;

    /// Get the name of this extractor
    fn platform_name(&self) -> &'static str;
}

/// Registry for managing multiple extractors, first match wins
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn MediaExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new registry with default extractors
    pub fn new(config: &ExtractorConfig) -> Self {
        let mut registry = Self::empty();

        // Direct media links skip yt-dlp entirely
        registry.register(Box::new(direct::DirectExtractor::new()));
        registry.register(Box::new(ytdlp::YtDlpExtractor::new(config)));

        registry
    }

    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Register a new extractor
    pub fn register(&mut self, extractor: Box<dyn MediaExtractor>) {
        self.extractors.push(extractor);
    }

    /// Find an extractor that supports the given URL
    pub fn find_extractor(&self, url: &str) -> Option<&dyn MediaExtractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.supports_url(url))
            .map(|boxed| boxed.as_ref())
    }

    /// List all registered extractors
    pub fn list_platforms(&self) -> Vec<&'static str> {
        self.extractors
            .iter()
            .map(|extractor| extractor.platform_name())
            .collect()
    }

    /// Validate the URL and resolve it with the first supporting extractor
    pub async fn resolve_audio(&self, url: &str) -> Result<AudioSource> {
        let url = validate_url(url)?.to_string();

        let extractor = self
            .find_extractor(&url)
            .ok_or_else(|| InsightError::UnsupportedUrl(format!("No extractor found for URL: {}", url)))?;

        tracing::debug!("Resolving audio with {}", extractor.platform_name());
        extractor.resolve_audio(&url).await
    }
}

/// Validate and normalize URLs
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim())
        .map_err(|_| InsightError::UnsupportedUrl(format!("Invalid URL format: {}", url)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(InsightError::UnsupportedUrl("URL must use HTTP or HTTPS protocol".to_string()).into());
    }

    Ok(parsed)
}
