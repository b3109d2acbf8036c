//! crates/karma_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The classifier, the chat model and the record logs sit behind these traits so
//! the core never depends on a concrete HTTP client or file format.

use async_trait::async_trait;

use crate::conversation::SamplingParams;
use crate::domain::{ChatMessage, DeedRecord, MoodRecord, Sentiment};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait SentimentService: Send + Sync {
    /// Classifies a piece of free text.
    async fn classify(&self, text: &str) -> PortResult<Sentiment>;
}

#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Requests exactly one reply for the given prompt sequence.
    async fn complete(&self, messages: &[ChatMessage], params: SamplingParams)
        -> PortResult<String>;
}

#[async_trait]
pub trait DeedLog: Send + Sync {
    /// All readable deeds, oldest first, each paired with its row position.
    ///
    /// Positions are stable across unreadable rows, so they can be handed
    /// straight back to `delete_at`.
    async fn list(&self) -> PortResult<Vec<(usize, DeedRecord)>>;

    async fn append(&self, deed: DeedRecord) -> PortResult<()>;

    /// Removes the row at position `index`. Out-of-range indices are ignored.
    async fn delete_at(&self, index: usize) -> PortResult<()>;
}

#[async_trait]
pub trait MoodLog: Send + Sync {
    /// All moods, newest first.
    async fn list_recent_first(&self) -> PortResult<Vec<MoodRecord>>;

    async fn append(&self, mood: MoodRecord) -> PortResult<()>;

    /// Removes every mood whose timestamp equals `timestamp` exactly.
    async fn delete_by_timestamp(&self, timestamp: &str) -> PortResult<()>;
}
