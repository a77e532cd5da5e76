use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::InsightError;

pub mod processor;

use processor::{TranscriptFetcher, TranscriptionProcessor};

/// Lifecycle state reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Sentiment of one transcribed sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub text: String,

    /// Start offset in milliseconds
    pub start: u64,

    /// End offset in milliseconds
    pub end: u64,

    pub sentiment: Sentiment,

    pub confidence: f64,

    #[serde(default)]
    pub speaker: Option<String>,
}

/// Transcript object as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,

    pub status: TranscriptStatus,

    /// Failure reason when `status` is `error`
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    /// Bullet summary requested with the transcript
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub sentiment_analysis_results: Option<Vec<SentimentResult>>,

    /// Audio duration in seconds
    #[serde(default)]
    pub audio_duration: Option<f64>,
}

impl Transcript {
    pub fn sentiment_results(&self) -> &[SentimentResult] {
        self.sentiment_analysis_results.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    language_code: &'a str,
    summarization: bool,
    summary_model: &'a str,
    summary_type: &'a str,
    sentiment_analysis: bool,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

/// Speech-to-text provider seam used by the pipeline
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Stream audio from a direct URL into the provider's storage
    async fn upload_from_url(&self, audio_url: &str) -> Result<String>;

    /// Request a transcript with sentiment analysis and summarization
    async fn submit(&self, upload_url: &str) -> Result<Transcript>;

    /// Poll until the transcript completes or fails
    async fn wait_for_completion(&self, transcript_id: &str) -> Result<Transcript>;
}

/// AssemblyAI REST client covering upload, transcripts and LeMUR
pub struct AssemblyAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    language_code: String,
    summary_model: String,
    summary_type: String,
    final_model: String,
    poll_interval: Duration,
    show_progress: bool,
}

impl AssemblyAiClient {
    /// Create a client from configuration; fails without an API key
    pub fn new(config: &Config, show_progress: bool) -> Result<Self> {
        let api_key = config.api_key()?.to_string();

        Ok(Self {
            http: Client::new(),
            base_url: config.assemblyai.base_url.trim_end_matches('/').to_string(),
            api_key,
            language_code: config.assemblyai.language_code.clone(),
            summary_model: config.assemblyai.summary_model.clone(),
            summary_type: config.assemblyai.summary_type.clone(),
            final_model: config.lemur.final_model.clone(),
            poll_interval: config.poll_interval(),
            show_progress,
        })
    }

    pub fn final_model(&self) -> &str {
        &self.final_model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub(crate) fn progress_spinner(&self, message: &'static str) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let progress = ProgressBar::new_spinner();
        progress.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?);
        progress.enable_steady_tick(Duration::from_millis(120));
        progress.set_message(message);
        Ok(progress)
    }

    fn upload_progress(&self, total: Option<u64>) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let progress = match total {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(ProgressStyle::with_template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}",
                )?);
                bar
            }
            None => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(ProgressStyle::with_template(
                    "{spinner:.green} [{elapsed_precise}] {bytes} {msg}",
                )?);
                spinner
            }
        };
        progress.set_message("Uploading audio...");
        Ok(progress)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B, action: &str) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", path);

        let response = self
            .http
            .post(self.endpoint(path))
            .header(AUTHORIZATION, self.api_key.as_str())
            .json(body)
            .send()
            .await
            .with_context(|| format!("{} request failed", action))?;

        ensure_success(response, action)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", action))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, action: &str) -> Result<T> {
        tracing::debug!("GET {}", path);

        let response = self
            .http
            .get(self.endpoint(path))
            .header(AUTHORIZATION, self.api_key.as_str())
            .send()
            .await
            .with_context(|| format!("{} request failed", action))?;

        ensure_success(response, action)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", action))
    }
}

#[async_trait]
impl TranscriptionService for AssemblyAiClient {
    async fn upload_from_url(&self, audio_url: &str) -> Result<String> {
        tracing::info!("Streaming audio to AssemblyAI");

        let source = self
            .http
            .get(audio_url)
            .send()
            .await
            .context("Failed to open audio stream")?;
        let source = ensure_success(source, "Audio download").await?;

        let progress = self.upload_progress(source.content_length())?;
        let counter = progress.clone();
        let stream = source
            .bytes_stream()
            .inspect_ok(move |chunk| counter.inc(chunk.len() as u64));

        let upload = async move {
            let response = self
                .http
                .post(self.endpoint("v2/upload"))
                .header(AUTHORIZATION, self.api_key.as_str())
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(reqwest::Body::wrap_stream(stream))
                .send()
                .await
                .context("Failed to upload audio")?;

            let uploaded: UploadResponse = ensure_success(response, "Audio upload")
                .await?
                .json()
                .await
                .context("Failed to parse upload response")?;

            Ok::<_, anyhow::Error>(uploaded)
        };
        let uploaded = clear_on_error(&progress, upload.await)?;

        progress.finish_with_message("Upload complete");
        tracing::info!("Uploaded audio to AssemblyAI");

        Ok(uploaded.upload_url)
    }

    async fn submit(&self, upload_url: &str) -> Result<Transcript> {
        let request = TranscriptRequest {
            audio_url: upload_url,
            language_code: &self.language_code,
            summarization: true,
            summary_model: &self.summary_model,
            summary_type: &self.summary_type,
            sentiment_analysis: true,
        };

        self.post_json("v2/transcript", &request, "Transcript request")
            .await
    }

    async fn wait_for_completion(&self, transcript_id: &str) -> Result<Transcript> {
        TranscriptionProcessor::new(self, transcript_id, self.poll_interval)
            .with_progress(self.progress_spinner("Waiting for transcription...")?)
            .wait_for_completion()
            .await
    }
}

#[async_trait]
impl TranscriptFetcher for AssemblyAiClient {
    async fn fetch_transcript(&self, transcript_id: &str) -> Result<Transcript> {
        self.get_json(&format!("v2/transcript/{}", transcript_id), "Transcript status")
            .await
    }
}

/// Take a progress line off the terminal when the step it tracks fails
pub(crate) fn clear_on_error<T>(progress: &ProgressBar, result: Result<T>) -> Result<T> {
    result.inspect_err(|_| progress.finish_and_clear())
}

/// Turn a non-2xx response into [`InsightError::Http`] carrying the body
async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(InsightError::Http {
        action: action.to_string(),
        status: status.as_u16(),
        body: body.trim().to_string(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETED: &str = r#"{
        "id": "5551722-f677-48a2-b57f-64b4d8d4c7c0",
        "status": "completed",
        "text": "Welcome back. Today went great.",
        "summary": "- The host welcomes listeners back.",
        "audio_duration": 12,
        "sentiment_analysis_results": [
            {"text": "Welcome back.", "start": 250, "end": 1200, "sentiment": "NEUTRAL", "confidence": 0.72, "speaker": null},
            {"text": "Today went great.", "start": 1300, "end": 2600, "sentiment": "POSITIVE", "confidence": 0.95}
        ],
        "words": []
    }"#;

    #[test]
    fn test_deserialize_completed_transcript() {
        let transcript: Transcript = serde_json::from_str(COMPLETED).unwrap();
        assert_eq!(transcript.status, TranscriptStatus::Completed);
        assert_eq!(transcript.audio_duration, Some(12.0));
        assert_eq!(transcript.sentiment_results().len(), 2);
        assert_eq!(transcript.sentiment_results()[1].sentiment, Sentiment::Positive);
        assert_eq!(transcript.sentiment_results()[1].start, 1300);
    }

    #[test]
    fn test_deserialize_queued_transcript() {
        let transcript: Transcript = serde_json::from_str(
            r#"{"id": "abc", "status": "queued", "sentiment_analysis_results": null}"#,
        )
        .unwrap();
        assert_eq!(transcript.status, TranscriptStatus::Queued);
        assert!(transcript.sentiment_results().is_empty());
        assert!(transcript.summary.is_none());
    }

    #[test]
    fn test_deserialize_error_transcript() {
        let transcript: Transcript = serde_json::from_str(
            r#"{"id": "abc", "status": "error", "error": "Download error"}"#,
        )
        .unwrap();
        assert_eq!(transcript.status, TranscriptStatus::Error);
        assert_eq!(transcript.error.as_deref(), Some("Download error"));
    }

    #[test]
    fn test_transcript_request_body() {
        let request = TranscriptRequest {
            audio_url: "https://cdn.assemblyai.com/upload/1",
            language_code: "en",
            summarization: true,
            summary_model: "informative",
            summary_type: "bullets_verbose",
            sentiment_analysis: true,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["audio_url"], "https://cdn.assemblyai.com/upload/1");
        assert_eq!(body["summary_type"], "bullets_verbose");
        assert_eq!(body["sentiment_analysis"], true);
    }

    #[test]
    fn test_client_requires_api_key() {
        let err = AssemblyAiClient::new(&Config::default(), false)
            .err()
            .expect("client without key");
        assert!(matches!(
            err.downcast_ref::<InsightError>(),
            Some(InsightError::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_client_endpoint() {
        let mut config = Config::default();
        config.assemblyai.base_url = "http://localhost:8080/".to_string();
        config.apply_api_key(Some("key".to_string()));

        let client = AssemblyAiClient::new(&config, false).unwrap();
        assert_eq!(client.endpoint("v2/upload"), "http://localhost:8080/v2/upload");
        assert_eq!(client.final_model(), "anthropic/claude-3-5-sonnet");
    }

    #[test]
    fn test_clear_on_error_finishes_bar() {
        let progress = ProgressBar::hidden();
        let result: Result<()> = Err(anyhow::anyhow!("upload refused"));

        tokio_test::assert_err!(clear_on_error(&progress, result));
        assert!(progress.is_finished());

        let progress = ProgressBar::hidden();
        assert_eq!(clear_on_error(&progress, Ok(7)).unwrap(), 7);
        assert!(!progress.is_finished());
    }
}
