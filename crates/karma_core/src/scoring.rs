//! crates/karma_core/src/scoring.rs
//!
//! Turns the sentiment of a deed description into a karma delta.

use tracing::debug;

use crate::domain::{Sentiment, SentimentLabel};
use crate::ports::{PortResult, SentimentService};

pub const NEUTRAL_REASON: &str = "Neutral deed";

/// Points and the human-readable reason they were awarded for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeedScore {
    pub points: i32,
    pub reason: String,
}

/// Scores a deed by asking the classifier for its sentiment.
pub async fn score(classifier: &dyn SentimentService, text: &str) -> PortResult<DeedScore> {
    let sentiment = classifier.classify(text).await?;
    let scored = points_for(&sentiment);
    debug!(
        label = ?sentiment.label,
        confidence = sentiment.confidence,
        points = scored.points,
        "Scored deed"
    );
    Ok(scored)
}

/// Maps a classifier result onto `-10..=10`.
///
/// Confidence is clamped to `[0, 1]` and rounded half away from zero.
pub fn points_for(sentiment: &Sentiment) -> DeedScore {
    let confidence = sentiment.confidence.clamp(0.0, 1.0);
    let magnitude = (confidence * 10.0).round() as i32;
    match sentiment.label {
        SentimentLabel::Positive => DeedScore {
            points: magnitude,
            reason: format!("Positive deed (confidence {confidence:.2})"),
        },
        SentimentLabel::Negative => DeedScore {
            points: -magnitude,
            reason: format!("Negative deed (confidence {confidence:.2})"),
        },
        SentimentLabel::Other(_) => DeedScore {
            points: 0,
            reason: NEUTRAL_REASON.to_string(),
        },
    }
}
