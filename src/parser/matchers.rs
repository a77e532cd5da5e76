//! Named patterns recognised in LLM analysis text.
//!
//! Every marker the parsers react to lives here as a small function over
//! `&str`. When the model's formatting drifts, this is the only file that
//! should need to change.

use regex::Regex;
use std::sync::LazyLock;

/// `1. Title` or `1. **Title**` at the start of a haystack.
static TOP_LEVEL_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.\s+(?:\*\*)?[^*\n]").expect("valid top-level item regex")
});

/// Same shape as [`TOP_LEVEL_ITEM`], capturing the label.
static ITEM_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.\s*(?:\*\*)?([^*\n]+)(?:\*\*)?").expect("valid item title regex")
});

/// `a. Label`, `b. **Label**:` and friends, on a trimmed line.
static SUBSECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z])\.\s*(?:\*\*)?([^*\n]+?)(?:\*\*)?(?::|$)")
        .expect("valid subsection header regex")
});

static NUMBERED_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").expect("valid numbered point regex"));

static LINE_CHART_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*Line Chart Analysis\*\*:?").expect("valid line chart header regex")
});

static PIE_CHART_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*Pie Chart Analysis\*\*:?").expect("valid pie chart header regex")
});

/// Where the line chart division stops.
static PIE_CHART_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*Pie Chart Analysis").expect("valid pie chart boundary regex")
});

/// `\n  b. ` between chart bullet points. Lowercase letters only.
static CHART_POINT_DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*[a-z]\.\s+").expect("valid chart point delimiter regex")
});

/// Byte offsets at which a new top-level numbered item begins.
///
/// A digit directly preceded by another digit belongs to the same number and
/// never starts an item, so `12. Foo` yields a single offset.
pub fn top_level_item_starts(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();

    bytes
        .iter()
        .enumerate()
        .filter(|(i, b)| b.is_ascii_digit() && (*i == 0 || !bytes[i - 1].is_ascii_digit()))
        .map(|(i, _)| i)
        .filter(|&i| TOP_LEVEL_ITEM.is_match(&text[i..]))
        .collect()
}

/// Raw title label of a chunk and the byte offset where the title match ends.
pub fn item_title(chunk: &str) -> Option<(&str, usize)> {
    let captures = ITEM_TITLE.captures(chunk)?;
    let whole = captures.get(0)?;
    let label = captures.get(1)?;

    Some((label.as_str(), whole.end()))
}

/// Raw subtitle of a lettered subsection header line.
pub fn subsection_header(line: &str) -> Option<&str> {
    SUBSECTION_HEADER
        .captures(line)
        .and_then(|captures| captures.get(2))
        .map(|label| label.as_str())
}

/// Text following a `12. ` style prefix.
pub fn numbered_point(line: &str) -> Option<&str> {
    NUMBERED_POINT.find(line).map(|prefix| &line[prefix.end()..])
}

/// Body of the line chart division, up to the pie chart marker.
pub fn line_chart_span(text: &str) -> Option<&str> {
    let header = LINE_CHART_HEADER.find(text)?;
    let rest = &text[header.end()..];

    Some(match PIE_CHART_BOUNDARY.find(rest) {
        Some(boundary) => &rest[..boundary.start()],
        None => rest,
    })
}

/// Body of the pie chart division, to the end of the text.
pub fn pie_chart_span(text: &str) -> Option<&str> {
    PIE_CHART_HEADER
        .find(text)
        .map(|header| &text[header.end()..])
}

/// Splits a chart division into its leading text followed by bullet bodies.
pub fn split_chart_points(span: &str) -> impl Iterator<Item = &str> {
    CHART_POINT_DELIMITER.split(span)
}

/// Characters that mark a bullet point at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletGlyphs(Vec<char>);

impl BulletGlyphs {
    pub const DEFAULT: [char; 3] = ['•', '-', '*'];

    pub fn new(glyphs: impl IntoIterator<Item = char>) -> Self {
        Self(glyphs.into_iter().collect())
    }

    /// Removes exactly one leading bullet glyph, if the line starts with one.
    pub fn strip_marker<'a>(&self, line: &'a str) -> Option<&'a str> {
        let first = line.chars().next()?;

        self.0
            .contains(&first)
            .then(|| &line[first.len_utf8()..])
    }
}

impl Default for BulletGlyphs {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}
