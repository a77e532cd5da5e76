use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::extractors::ExtractorRegistry;
use crate::narrative::{NarrativeAnalyzer, ANALYSIS_PROMPT, CHART_PROMPT};
use crate::parser::{parse_chart_analysis, AnalysisSection, ChartSection, SectionParser};
use crate::sentiment::{project_series, SentimentPoint};
use crate::transcribe::{AssemblyAiClient, Transcript, TranscriptionService};
use crate::utils;

/// Response body consumed by the charting frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Provider's bullet summary of the transcript
    pub summary_data: Option<String>,

    /// Cumulative sentiment score over time
    pub sentiment_data: Vec<SentimentPoint>,

    /// Structured narrative analysis
    pub ai_analysis_data: Vec<AnalysisSection>,

    pub line_chart_analysis: Vec<ChartSection>,

    pub pie_chart_analysis: Vec<ChartSection>,
}

/// Sequential video-to-report pipeline
pub struct AnalysisPipeline {
    extractors: ExtractorRegistry,
    transcriber: Arc<dyn TranscriptionService>,
    analyzer: Arc<dyn NarrativeAnalyzer>,
    parser: SectionParser,
}

impl AnalysisPipeline {
    /// Create a pipeline backed by AssemblyAI
    pub fn new(config: &Config, show_progress: bool) -> Result<Self> {
        let client = Arc::new(AssemblyAiClient::new(config, show_progress)?);

        Ok(Self::with_services(
            ExtractorRegistry::new(&config.extractor),
            client.clone(),
            client,
            SectionParser::new(config.bullet_glyphs()),
        ))
    }

    /// Create a pipeline from explicit collaborators
    pub fn with_services(
        extractors: ExtractorRegistry,
        transcriber: Arc<dyn TranscriptionService>,
        analyzer: Arc<dyn NarrativeAnalyzer>,
        parser: SectionParser,
    ) -> Self {
        Self {
            extractors,
            transcriber,
            analyzer,
            parser,
        }
    }

    /// Transcribe a video URL and build the chart-ready report.
    ///
    /// Every stage finishes before the next one starts; the first failure
    /// aborts the run and nothing partial is returned.
    #[tracing::instrument(skip(self), fields(run_id = %Uuid::new_v4()))]
    pub async fn run(&self, video_url: &str) -> Result<AnalysisReport> {
        tracing::info!(
            domain = utils::extract_domain(video_url).as_deref().unwrap_or("unknown"),
            "Starting transcription and analysis"
        );

        let audio = self.extractors.resolve_audio(video_url).await?;
        match audio.file_size {
            Some(size) => tracing::info!(
                platform = %audio.platform,
                size = %utils::format_file_size(size),
                "Resolved audio stream"
            ),
            None => tracing::info!(platform = %audio.platform, "Resolved audio stream"),
        }

        let upload_url = self.transcriber.upload_from_url(&audio.stream_url).await?;

        let submitted = self.transcriber.submit(&upload_url).await?;
        tracing::info!(transcript_id = %submitted.id, "Transcription started");

        let transcript = self.transcriber.wait_for_completion(&submitted.id).await?;

        let analysis_text = self.analyzer.run_task(&transcript.id, ANALYSIS_PROMPT).await?;
        let chart_text = self.analyzer.run_task(&transcript.id, CHART_PROMPT).await?;

        let report = self.build_report(&transcript, &analysis_text, &chart_text);
        tracing::info!(
            sections = report.ai_analysis_data.len(),
            sentiment_points = report.sentiment_data.len(),
            "Analysis complete"
        );

        Ok(report)
    }

    /// Shape a completed transcript and both LLM responses into a report
    pub fn build_report(
        &self,
        transcript: &Transcript,
        analysis_text: &str,
        chart_text: &str,
    ) -> AnalysisReport {
        let charts = parse_chart_analysis(chart_text);

        AnalysisReport {
            summary_data: transcript.summary.clone(),
            sentiment_data: project_series(transcript.sentiment_results()),
            ai_analysis_data: self.parser.parse(analysis_text),
            line_chart_analysis: charts.line_chart_analysis,
            pie_chart_analysis: charts.pie_chart_analysis,
        }
    }
}
