use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::parser::{AnalysisSection, ChartAnalysis, ChartSection};
use crate::pipeline::AnalysisReport;
use crate::sentiment::SentimentPoint;
use crate::utils::format_timestamp;

/// Format any serializable result as JSON
pub fn format_as_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

/// Format a full report as a readable outline
pub fn report_as_text(report: &AnalysisReport) -> String {
    let mut output = String::new();

    push_heading(&mut output, "Summary");
    match report.summary_data.as_deref().map(str::trim) {
        Some(summary) if !summary.is_empty() => {
            output.push_str(summary);
            output.push('\n');
        }
        _ => output.push_str("(no summary)\n"),
    }

    output.push('\n');
    push_heading(&mut output, "Sentiment");
    output.push_str(&sentiment_as_text(&report.sentiment_data));

    output.push('\n');
    push_heading(&mut output, "Analysis");
    output.push_str(&sections_as_text(&report.ai_analysis_data));

    output.push('\n');
    output.push_str(&charts_as_text(&ChartAnalysis {
        line_chart_analysis: report.line_chart_analysis.clone(),
        pie_chart_analysis: report.pie_chart_analysis.clone(),
    }));

    output
}

/// Numbered sections with lettered subsections and bulleted points
pub fn sections_as_text(sections: &[AnalysisSection]) -> String {
    if sections.is_empty() {
        return "(no sections)\n".to_string();
    }

    let mut output = String::new();

    for (i, section) in sections.iter().enumerate() {
        let _ = writeln!(output, "{}. {}", i + 1, section.title);

        for (j, subsection) in section.subsections.iter().enumerate() {
            let _ = writeln!(output, "   {}. {}", subsection_letter(j), subsection.subtitle);

            for point in &subsection.points {
                let _ = writeln!(output, "      - {}", point);
            }
        }
    }

    output
}

/// Both chart narratives under their own headings
pub fn charts_as_text(charts: &ChartAnalysis) -> String {
    let mut output = String::new();

    push_heading(&mut output, "Line Chart");
    push_chart_sections(&mut output, &charts.line_chart_analysis);

    output.push('\n');
    push_heading(&mut output, "Pie Chart");
    push_chart_sections(&mut output, &charts.pie_chart_analysis);

    output
}

fn sentiment_as_text(series: &[SentimentPoint]) -> String {
    match series.last() {
        Some(last) => format!(
            "{} points over {}, final score {}\n",
            series.len(),
            format_timestamp(last.timestamp),
            last.score
        ),
        None => "(no sentiment data)\n".to_string(),
    }
}

fn push_chart_sections(output: &mut String, sections: &[ChartSection]) {
    if sections.is_empty() {
        output.push_str("(not provided)\n");
        return;
    }

    for section in sections {
        if !section.title.is_empty() {
            let _ = writeln!(output, "{}", section.title);
        }
        for point in &section.bullet_points {
            let _ = writeln!(output, "- {}", point);
        }
    }
}

fn push_heading(output: &mut String, title: &str) {
    let _ = writeln!(output, "{}\n{}", title, "-".repeat(title.chars().count()));
}

fn subsection_letter(index: usize) -> char {
    char::from(b'a' + (index % 26) as u8)
}
