//! Reshapes the free-form text returned by the analysis model into the
//! structures the charting frontend consumes.
//!
//! Two independent shapes are produced: nested [`AnalysisSection`]s for the
//! general analysis prompt and flat [`ChartSection`]s for the chart prompt.
//! Both parsers are total over arbitrary input and hold no shared mutable
//! state, so they can be called from any number of tasks at once.

pub mod chart;
pub mod matchers;
pub mod sections;

pub use chart::{parse_chart_analysis, ChartAnalysis, ChartSection};
pub use matchers::BulletGlyphs;
pub use sections::{AnalysisSection, SectionParser, Subsection};

/// Trim whitespace, then drop one `**` bold marker at the very start and one
/// at the very end.
pub fn clean_text(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix("**").unwrap_or(trimmed);
    trimmed.strip_suffix("**").unwrap_or(trimmed)
}
