use serde::{Deserialize, Serialize};

use super::matchers;

/// Flat narrative for one chart type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSection {
    /// Leading text of the division, may be empty
    pub title: String,

    pub bullet_points: Vec<String>,
}

/// Line and pie chart narratives parsed from the chart prompt response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartAnalysis {
    pub line_chart_analysis: Vec<ChartSection>,
    pub pie_chart_analysis: Vec<ChartSection>,
}

/// Parse the chart-description response.
///
/// Each division is located independently; a missing header leaves that
/// chart with an empty sequence instead of failing.
pub fn parse_chart_analysis(text: &str) -> ChartAnalysis {
    let line_chart_analysis = match matchers::line_chart_span(text) {
        Some(span) => vec![parse_division(span)],
        None => {
            tracing::warn!("Line chart header not found in chart analysis response");
            Vec::new()
        }
    };

    let pie_chart_analysis = match matchers::pie_chart_span(text) {
        Some(span) => vec![parse_division(span)],
        None => {
            tracing::warn!("Pie chart header not found in chart analysis response");
            Vec::new()
        }
    };

    ChartAnalysis {
        line_chart_analysis,
        pie_chart_analysis,
    }
}

fn parse_division(span: &str) -> ChartSection {
    let mut pieces = matchers::split_chart_points(span);
    let title = pieces.next().unwrap_or_default().trim().to_string();

    let bullet_points = pieces
        .map(str::trim)
        .filter(|point| !point.is_empty() && *point != "undefined")
        .map(str::to_string)
        .collect();

    ChartSection {
        title,
        bullet_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_divisions() {
        let text = "**Line Chart Analysis**:\na. Overall pattern\nb. Transitions\n**Pie Chart Analysis**:\na. Distribution";
        let analysis = parse_chart_analysis(text);

        assert_eq!(
            analysis.line_chart_analysis,
            vec![ChartSection {
                title: String::new(),
                bullet_points: vec!["Overall pattern".to_string(), "Transitions".to_string()],
            }]
        );
        assert_eq!(
            analysis.pie_chart_analysis,
            vec![ChartSection {
                title: String::new(),
                bullet_points: vec!["Distribution".to_string()],
            }]
        );
    }

    #[test]
    fn test_leading_text_becomes_title() {
        let text = "Content type: educational\n\n**line chart analysis**: Mostly upbeat\n  a. Starts neutral\n  b. undefined\n  c. Ends positive\n";
        let analysis = parse_chart_analysis(text);

        assert_eq!(analysis.line_chart_analysis.len(), 1);
        assert_eq!(analysis.line_chart_analysis[0].title, "Mostly upbeat");
        assert_eq!(
            analysis.line_chart_analysis[0].bullet_points,
            vec!["Starts neutral", "Ends positive"]
        );
        assert!(analysis.pie_chart_analysis.is_empty());
    }

    #[test]
    fn test_missing_headers() {
        let analysis = parse_chart_analysis("The model ignored the requested format.");
        assert_eq!(analysis, ChartAnalysis::default());
    }

    #[test]
    fn test_pie_without_line() {
        let analysis = parse_chart_analysis("**Pie Chart Analysis**:\na. Mostly neutral\nb. ");
        assert!(analysis.line_chart_analysis.is_empty());
        assert_eq!(
            analysis.pie_chart_analysis[0].bullet_points,
            vec!["Mostly neutral"]
        );
    }

    #[test]
    fn test_empty_division_still_yields_one_section() {
        let analysis = parse_chart_analysis("**Line Chart Analysis**:**Pie Chart Analysis**:");
        assert_eq!(
            analysis.line_chart_analysis,
            vec![ChartSection {
                title: String::new(),
                bullet_points: vec![],
            }]
        );
        assert_eq!(analysis.pie_chart_analysis.len(), 1);
    }

    #[test]
    fn test_serializes_camel_case() {
        let analysis = parse_chart_analysis("**Pie Chart Analysis**:\na. Split");
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["pieChartAnalysis"][0]["bulletPoints"][0], "Split");
        assert!(json["lineChartAnalysis"].as_array().unwrap().is_empty());
    }
}
