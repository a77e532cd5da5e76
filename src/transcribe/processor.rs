use anyhow::Result;
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use super::{clear_on_error, Transcript, TranscriptStatus};
use crate::InsightError;

/// Source of transcript status snapshots
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch_transcript(&self, transcript_id: &str) -> Result<Transcript>;
}

/// Polls a transcript until it leaves the queue
pub struct TranscriptionProcessor<'a, F: TranscriptFetcher + ?Sized> {
    fetcher: &'a F,
    transcript_id: String,
    poll_interval: Duration,
    progress: ProgressBar,
}

impl<'a, F: TranscriptFetcher + ?Sized> TranscriptionProcessor<'a, F> {
    pub fn new(fetcher: &'a F, transcript_id: &str, poll_interval: Duration) -> Self {
        Self {
            fetcher,
            transcript_id: transcript_id.to_string(),
            poll_interval,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Wait for the transcript to complete, checking at a fixed interval
    pub async fn wait_for_completion(&self) -> Result<Transcript> {
        let start_time = Instant::now();
        let mut check_count = 0u32;

        loop {
            check_count += 1;

            let transcript = clear_on_error(
                &self.progress,
                self.fetcher.fetch_transcript(&self.transcript_id).await,
            )?;

            match transcript.status {
                TranscriptStatus::Completed => {
                    self.progress.finish_with_message("Transcription completed!");
                    tracing::info!(
                        transcript_id = %self.transcript_id,
                        checks = check_count,
                        elapsed_secs = start_time.elapsed().as_secs(),
                        "Transcription completed"
                    );
                    return Ok(transcript);
                }
                TranscriptStatus::Error => {
                    self.progress.finish_with_message("Transcription failed");

                    let reason = transcript
                        .error
                        .unwrap_or_else(|| "Unknown error".to_string());
                    return Err(InsightError::TranscriptionFailed(reason).into());
                }
                TranscriptStatus::Queued | TranscriptStatus::Processing => {
                    self.progress.set_message(format!(
                        "Transcribing... ({}s elapsed, check #{})",
                        start_time.elapsed().as_secs(),
                        check_count
                    ));
                    tracing::debug!(status = ?transcript.status, check_count, "Transcript not ready");

                    sleep(self.poll_interval).await;
                }
            }
        }
    }
}
