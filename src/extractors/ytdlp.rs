use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use super::{AudioSource, MediaExtractor};
use crate::config::ExtractorConfig;
use crate::{InsightError, Result};

/// Resolves the best audio stream of any page yt-dlp understands
pub struct YtDlpExtractor {
    yt_dlp_path: String,
    format: String,
    audio_quality: String,
}

impl YtDlpExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            yt_dlp_path: config.yt_dlp_path.clone(),
            format: config.format.clone(),
            audio_quality: config.audio_quality.clone(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> bool {
        let output = Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        matches!(output, Ok(output) if output.status.success())
    }

    fn resolve_args<'a>(&'a self, url: &'a str) -> [&'a str; 7] {
        [
            "-f",
            &self.format,
            "--audio-quality",
            &self.audio_quality,
            "--no-playlist",
            "-g",
            url,
        ]
    }
}

/// First non-empty line of `yt-dlp -g` output
fn first_stream_url(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).find(|line| !line.is_empty())
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn resolve_audio(&self, url: &str) -> Result<AudioSource> {
        if !self.check_availability().await {
            return Err(InsightError::AudioExtractionFailed(
                "yt-dlp is not available. Please install it: https://github.com/yt-dlp/yt-dlp"
                    .to_string(),
            )
            .into());
        }

        tracing::debug!("Resolving audio stream for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args(self.resolve_args(url))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(InsightError::AudioExtractionFailed(format!("yt-dlp failed: {}", error.trim())).into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stream_url = first_stream_url(&stdout).ok_or_else(|| {
            InsightError::AudioExtractionFailed("yt-dlp returned no audio URL".to_string())
        })?;

        tracing::info!("Got audio URL");

        Ok(AudioSource {
            stream_url: stream_url.to_string(),
            original_url: url.to_string(),
            platform: self.platform_name().to_string(),
            title: None,
            file_size: None,
        })
    }

    fn supports_url(&self, url: &str) -> bool {
        // yt-dlp's generic extractor handles arbitrary pages
        url.starts_with("http://") || url.starts_with("https://")
    }

    fn platform_name(&self) -> &'static str {
        "yt-dlp"
    }
}
