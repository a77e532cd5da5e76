use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::clean_text;
use super::matchers::{self, BulletGlyphs};

/// One top-level numbered item of the analysis response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Cleaned label of the numbered item, never empty
    pub title: String,

    /// Lettered groupings in encounter order
    pub subsections: Vec<Subsection>,
}

/// Lettered grouping of points within a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    pub subtitle: String,

    /// Distinct points in encounter order
    pub points: Vec<String>,
}

impl Subsection {
    fn new(subtitle: &str) -> Self {
        Self {
            subtitle: subtitle.to_string(),
            points: Vec::new(),
        }
    }

    fn push_point(&mut self, point: &str) {
        if !point.is_empty() && !self.points.iter().any(|existing| existing == point) {
            self.points.push(point.to_string());
        }
    }
}

/// Nested parser for the structured analysis prompt.
///
/// Parsing never fails: chunks without a recognisable title are dropped and
/// lines that precede any subsection are ignored.
#[derive(Debug, Clone, Default)]
pub struct SectionParser {
    bullets: BulletGlyphs,
}

impl SectionParser {
    pub fn new(bullets: BulletGlyphs) -> Self {
        Self { bullets }
    }

    /// Parse an LLM analysis response into titled sections
    pub fn parse(&self, text: &str) -> Vec<AnalysisSection> {
        let chunks = dedup_chunks(split_chunks(text));
        let chunk_count = chunks.len();

        let sections: Vec<AnalysisSection> = chunks
            .into_iter()
            .filter_map(|chunk| self.parse_chunk(chunk))
            .collect();

        tracing::debug!(
            chunks = chunk_count,
            sections = sections.len(),
            "Parsed analysis sections"
        );

        sections
    }

    fn parse_chunk(&self, chunk: &str) -> Option<AnalysisSection> {
        let (label, title_end) = matchers::item_title(chunk)?;
        let title = clean_text(label);
        if title.is_empty() {
            return None;
        }

        Some(AnalysisSection {
            title: title.to_string(),
            subsections: self.collect_subsections(&chunk[title_end..]),
        })
    }

    fn collect_subsections(&self, body: &str) -> Vec<Subsection> {
        let mut subsections = Vec::new();
        let mut current: Option<Subsection> = None;

        for line in body.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Some(subtitle) = matchers::subsection_header(line) {
                if let Some(finished) = current.replace(Subsection::new(clean_text(subtitle))) {
                    subsections.push(finished);
                }
                continue;
            }

            // Nothing to attach to until the first lettered header.
            let Some(open) = current.as_mut() else {
                continue;
            };

            let point = if let Some(rest) = self.bullets.strip_marker(line) {
                rest.trim()
            } else if let Some(rest) = matchers::numbered_point(line) {
                rest.trim()
            } else {
                line
            };
            open.push_point(point);
        }

        if let Some(finished) = current {
            subsections.push(finished);
        }

        let mut seen = HashSet::new();
        subsections
            .into_iter()
            .filter(|sub| seen.insert(sub.subtitle.clone()))
            .filter(|sub| !sub.subtitle.is_empty())
            .collect()
    }
}

/// Cut the text in front of every top-level item, keeping the marker with
/// the chunk that follows it.
fn split_chunks(text: &str) -> Vec<&str> {
    let mut bounds = matchers::top_level_item_starts(text);
    if bounds.first() != Some(&0) {
        bounds.insert(0, 0);
    }
    bounds.push(text.len());

    bounds
        .windows(2)
        .map(|pair| &text[pair[0]..pair[1]])
        .filter(|chunk| !chunk.trim().is_empty())
        .collect()
}

/// First chunk wins among chunks with identical cleaned text.
fn dedup_chunks(chunks: Vec<&str>) -> Vec<&str> {
    let mut seen = HashSet::new();
    chunks
        .into_iter()
        .filter(|chunk| seen.insert(clean_text(chunk)))
        .collect()
}
