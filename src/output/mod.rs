use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::parser::{AnalysisSection, ChartAnalysis};
use crate::pipeline::AnalysisReport;

pub mod formatters;

pub use formatters::*;

/// Body emitted in place of a report when the pipeline fails
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self {
            error: format!("{:#}", err),
        }
    }
}

/// Render a full analysis report
pub fn render_report(report: &AnalysisReport, format: OutputFormat, compact: bool) -> Result<String> {
    match format {
        OutputFormat::Json => format_as_json(report, compact),
        OutputFormat::Text => Ok(report_as_text(report)),
    }
}

/// Render parsed analysis sections
pub fn render_sections(sections: &[AnalysisSection], format: OutputFormat, compact: bool) -> Result<String> {
    match format {
        OutputFormat::Json => format_as_json(sections, compact),
        OutputFormat::Text => Ok(sections_as_text(sections)),
    }
}

/// Render parsed chart narratives
pub fn render_charts(charts: &ChartAnalysis, format: OutputFormat, compact: bool) -> Result<String> {
    match format {
        OutputFormat::Json => format_as_json(charts, compact),
        OutputFormat::Text => Ok(charts_as_text(charts)),
    }
}

/// Render a pipeline failure
pub fn render_error(err: &anyhow::Error, format: OutputFormat, compact: bool) -> Result<String> {
    let body = ErrorBody::from_error(err);
    match format {
        OutputFormat::Json => format_as_json(&body, compact),
        OutputFormat::Text => Ok(format!("Error: {}", body.error)),
    }
}

/// Write rendered output to a file, or print it to the console
pub fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            fs_err::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
        }
        None => println!("{}", content),
    }
    Ok(())
}
