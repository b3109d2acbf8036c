//! crates/karma_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage or serialization format.

use serde::{Deserialize, Serialize};

//=========================================================================================
// Conversation
//=========================================================================================

/// One user-message/assistant-reply exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    user: String,
    assistant: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn assistant(&self) -> &str {
        &self.assistant
    }
}

/// The ordered turns of one session's confession conversation.
///
/// Grows by append only; `clear` is the single way to shrink it.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
    modified: bool,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.modified = true;
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.modified = true;
    }

    /// Whether the history changed since the owner last called `take_modified`.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn take_modified(&mut self) -> bool {
        std::mem::take(&mut self.modified)
    }
}

/// Who authored a message in a chat-completion prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single entry of the flattened prompt sent to the chat service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

//=========================================================================================
// Sentiment
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    /// Anything the classifier returns besides POSITIVE/NEGATIVE.
    Other(String),
}

impl SentimentLabel {
    /// Case-insensitive, so `"positive"` counts as `Positive`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Self::Positive,
            "NEGATIVE" => Self::Negative,
            _ => Self::Other(label.to_string()),
        }
    }
}

/// Output of the sentiment classifier for one piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// Classifier confidence, nominally in `[0, 1]`.
    pub confidence: f64,
}

//=========================================================================================
// Records
//=========================================================================================

/// A self-reported deed and the karma it earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeedRecord {
    pub description: String,
    pub points: i32,
    pub reason: String,
}

/// The row shapes tolerated in the deed log.
///
/// Older logs carry fewer columns: a missing reason defaults to `""` and a
/// row with only a description is worth one point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeedRow {
    Full { description: String, points: i32, reason: String },
    NoReason { description: String, points: i32 },
    DescriptionOnly { description: String },
}

impl DeedRow {
    pub const DEFAULT_POINTS: i32 = 1;

    /// Classifies raw fields. Returns `None` when a points column is present
    /// but is not an integer.
    pub fn from_fields(fields: &[&str]) -> Option<Self> {
        let row = match fields {
            [description, points, reason] => Self::Full {
                description: description.to_string(),
                points: points.trim().parse().ok()?,
                reason: reason.to_string(),
            },
            [description, points] => Self::NoReason {
                description: description.to_string(),
                points: points.trim().parse().ok()?,
            },
            [description, ..] => Self::DescriptionOnly {
                description: description.to_string(),
            },
            [] => Self::DescriptionOnly {
                description: String::new(),
            },
        };
        Some(row)
    }
}

impl From<DeedRow> for DeedRecord {
    fn from(row: DeedRow) -> Self {
        match row {
            DeedRow::Full { description, points, reason } => Self { description, points, reason },
            DeedRow::NoReason { description, points } => Self {
                description,
                points,
                reason: String::new(),
            },
            DeedRow::DescriptionOnly { description } => Self {
                description,
                points: DeedRow::DEFAULT_POINTS,
                reason: String::new(),
            },
        }
    }
}

/// Running karma total derived from the deed log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KarmaSummary {
    pub total_points: i32,
    /// Ten percent per point, clamped to `0..=100`.
    pub progress_percent: u8,
}

impl KarmaSummary {
    /// The total saturates at the `i32` bounds instead of overflowing.
    pub fn from_deeds<'a>(deeds: impl IntoIterator<Item = &'a DeedRecord>) -> Self {
        let total_points = deeds
            .into_iter()
            .fold(0i32, |total, d| total.saturating_add(d.points));
        let progress = total_points.clamp(0, 10) * 10;
        Self {
            total_points,
            progress_percent: progress as u8,
        }
    }
}

/// A logged mood. `timestamp` doubles as the deletion key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodRecord {
    pub emoji: String,
    pub note: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deed_row_shapes_default_missing_columns() {
        let full: DeedRecord = DeedRow::from_fields(&["helped", "7", "kind"]).unwrap().into();
        assert_eq!(full.points, 7);
        assert_eq!(full.reason, "kind");

        let no_reason: DeedRecord = DeedRow::from_fields(&["helped", " -3"]).unwrap().into();
        assert_eq!(no_reason.points, -3);
        assert_eq!(no_reason.reason, "");

        let bare: DeedRecord = DeedRow::from_fields(&["helped"]).unwrap().into();
        assert_eq!(bare.points, 1);

        let wide: DeedRecord = DeedRow::from_fields(&["a", "b", "c", "d"]).unwrap().into();
        assert_eq!(wide.description, "a");
        assert_eq!(wide.points, 1);
    }

    #[test]
    fn deed_row_rejects_non_integer_points() {
        assert_eq!(DeedRow::from_fields(&["helped", "lots"]), None);
        assert_eq!(DeedRow::from_fields(&["helped", "2.5", "x"]), None);
    }

    #[test]
    fn karma_progress_is_clamped() {
        let deed = |points| DeedRecord {
            description: "d".into(),
            points,
            reason: String::new(),
        };
        assert_eq!(KarmaSummary::from_deeds(&[deed(-4)]).progress_percent, 0);
        assert_eq!(KarmaSummary::from_deeds(&[deed(3), deed(1)]).progress_percent, 40);
        let big = KarmaSummary::from_deeds(&[deed(9), deed(8)]);
        assert_eq!(big.total_points, 17);
        assert_eq!(big.progress_percent, 100);
    }

    #[test]
    fn karma_total_saturates_on_extreme_rows() {
        let rows: Vec<DeedRecord> = [["a", "2147483647", "r"], ["b", "1", "r"]]
            .iter()
            .map(|fields| DeedRow::from_fields(fields).unwrap().into())
            .collect();
        let summary = KarmaSummary::from_deeds(&rows);
        assert_eq!(summary.total_points, i32::MAX);
        assert_eq!(summary.progress_percent, 100);

        let low: DeedRecord = DeedRow::from_fields(&["c", "-2147483648", "r"]).unwrap().into();
        let lower: DeedRecord = DeedRow::from_fields(&["d", "-5"]).unwrap().into();
        let summary = KarmaSummary::from_deeds(&[low, lower]);
        assert_eq!(summary.total_points, i32::MIN);
        assert_eq!(summary.progress_percent, 0);
    }

    #[test]
    fn history_tracks_modification() {
        let mut history = ConversationHistory::new();
        assert!(!history.is_modified());
        history.push(Turn::new("hi", "hello"));
        assert!(history.take_modified());
        assert!(!history.is_modified());
        history.clear();
        assert!(history.is_empty());
        assert!(history.is_modified());
    }
}
