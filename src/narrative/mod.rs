//! Narrative analysis requests against the LeMUR task endpoint.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::transcribe::{clear_on_error, AssemblyAiClient};
use crate::InsightError;

/// Four-part structured analysis, parsed by [`crate::parser::SectionParser`]
pub const ANALYSIS_PROMPT: &str = r#"Based on the transcription of the audio, provide a detailed analysis in the following structured format:

1. **Purpose and Context**
  a. Summarize the main objective or goal of the individuals involved.
  b. Describe the broader context of the discussion or content.

2. **Analysis and Feedback**
  a. Offer constructive feedback on key strengths related to the purpose or goal.
  b. Identify specific areas for improvement.

3. **Actionable Recommendations for improvement**
  a. Provide clear and specific recommendations for improvement.

4. **Improvement and Prevention Strategies**
  a. Recommend strategies to sustain improvements.
  b. Propose methods to prevent potential issues in similar contexts.

Ensure:
- Each section and subpoint is clearly labeled (e.g., "1. **Purpose and Context**, a., b.").
- Bullet points are separated by newlines for proper formatting.
- The response adheres strictly to markdown style for easy frontend rendering.
"#;

/// Line/pie chart narrative, parsed by [`crate::parser::parse_chart_analysis`]
pub const CHART_PROMPT: &str = r#"Identify the content type (e.g., educational, motivational, discussion, entertainment).
Analyze the sentiment of the provided transcription. Based on the inferred content type, provide:

**Line Chart Analysis**:
a. Overall sentiment progression pattern
b. Key emotional transitions
c. Notable temporal patterns

**Pie Chart Analysis**:
a. Distribution breakdown
b. Dominant sentiment patterns
c. Content type correlation

Ensure each point is clear and separated by newlines."#;

/// LLM task seam used by the pipeline
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NarrativeAnalyzer: Send + Sync {
    /// Run a free-form prompt against a completed transcript
    async fn run_task(&self, transcript_id: &str, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct LemurTaskRequest<'a> {
    transcript_ids: [&'a str; 1],
    prompt: &'a str,
    final_model: &'a str,
}

#[derive(Debug, Deserialize)]
struct LemurTaskResponse {
    request_id: String,
    response: String,
}

#[async_trait]
impl NarrativeAnalyzer for AssemblyAiClient {
    async fn run_task(&self, transcript_id: &str, prompt: &str) -> Result<String> {
        let request = LemurTaskRequest {
            transcript_ids: [transcript_id],
            prompt,
            final_model: self.final_model(),
        };

        let progress = self.progress_spinner("Waiting for LeMUR analysis...")?;
        let task: LemurTaskResponse = clear_on_error(
            &progress,
            self.post_json("lemur/v3/generate/task", &request, "LeMUR task")
                .await,
        )?;
        progress.finish_and_clear();

        tracing::info!(request_id = %task.request_id, "LeMUR task completed");

        if task.response.trim().is_empty() {
            return Err(InsightError::AnalysisFailed(format!(
                "LeMUR request {} returned an empty response",
                task.request_id
            ))
            .into());
        }

        Ok(task.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_chart_analysis, SectionParser};

    #[test]
    fn test_task_request_body() {
        let request = LemurTaskRequest {
            transcript_ids: ["tr-1"],
            prompt: CHART_PROMPT,
            final_model: "anthropic/claude-3-5-sonnet",
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["transcript_ids"], serde_json::json!(["tr-1"]));
        assert_eq!(body["final_model"], "anthropic/claude-3-5-sonnet");
    }

    #[test]
    fn test_task_response() {
        let task: LemurTaskResponse = serde_json::from_str(
            r#"{"request_id": "req-9", "response": "1. **Purpose**", "usage": {"input_tokens": 10}}"#,
        )
        .unwrap();
        assert_eq!(task.request_id, "req-9");
        assert_eq!(task.response, "1. **Purpose**");
    }

    #[test]
    fn test_analysis_prompt_outline_parses() {
        let sections = SectionParser::default().parse(ANALYSIS_PROMPT);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        // The quoted labelling example in the trailing instructions also reads
        // as a numbered item, so only the outline itself is checked.
        assert_eq!(
            titles[..4],
            [
                "Purpose and Context",
                "Analysis and Feedback",
                "Actionable Recommendations for improvement",
                "Improvement and Prevention Strategies",
            ]
        );
    }

    #[test]
    fn test_chart_prompt_outline_parses() {
        let charts = parse_chart_analysis(CHART_PROMPT);
        assert_eq!(charts.line_chart_analysis[0].bullet_points.len(), 3);
        assert_eq!(
            charts.pie_chart_analysis[0].bullet_points.last().map(String::as_str),
            Some("Content type correlation\n\nEnsure each point is clear and separated by newlines.")
        );
    }
}
