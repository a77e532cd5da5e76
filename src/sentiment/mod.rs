//! Projects per-sentence sentiment into the cumulative series behind the line chart.

use serde::{Deserialize, Serialize};

use crate::transcribe::{Sentiment, SentimentResult};

/// One point of the cumulative sentiment series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    /// Sentence start in seconds
    pub timestamp: f64,

    /// Running total: +1 per positive sentence, -1 per negative one
    pub score: i64,
}

/// Walk sentiment results in order, accumulating a running score.
pub fn project_series(results: &[SentimentResult]) -> Vec<SentimentPoint> {
    results
        .iter()
        .scan(0i64, |score, result| {
            *score += score_delta(result.sentiment);
            Some(SentimentPoint {
                timestamp: result.start as f64 / 1000.0,
                score: *score,
            })
        })
        .collect()
}

fn score_delta(sentiment: Sentiment) -> i64 {
    match sentiment {
        Sentiment::Positive => 1,
        Sentiment::Negative => -1,
        Sentiment::Neutral => 0,
    }
}
