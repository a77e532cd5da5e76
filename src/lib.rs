//! Video Insight - transcribe a video's audio and reshape the analysis into chart-ready JSON
//!
//! The pipeline resolves a streamable audio URL for a video, transcribes it with
//! AssemblyAI (sentiment analysis and summarization enabled), asks the LeMUR task
//! endpoint for a structured narrative analysis and a chart description, and
//! parses both free-form responses into the structures a charting frontend expects.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod narrative;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod sentiment;
pub mod transcribe;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat, ResponseKind};
pub use config::Config;
pub use extractors::{AudioSource, ExtractorRegistry, MediaExtractor};
pub use narrative::NarrativeAnalyzer;
pub use parser::{
    parse_chart_analysis, AnalysisSection, ChartAnalysis, ChartSection, SectionParser, Subsection,
};
pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use sentiment::SentimentPoint;
pub use transcribe::{AssemblyAiClient, Transcript, TranscriptionService};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the analysis pipeline
#[derive(thiserror::Error, Debug)]
pub enum InsightError {
    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),

    #[error("Audio extraction failed: {0}")]
    AudioExtractionFailed(String),

    #[error("{action} failed: HTTP {status}: {body}")]
    Http {
        action: String,
        status: u16,
        body: String,
    },

    #[error("Transcription error: {0}")]
    TranscriptionFailed(String),

    #[error("Narrative analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Missing required {0} in environment variables or configuration")]
    MissingApiKey(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
