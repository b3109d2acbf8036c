pub mod conversation;
pub mod domain;
pub mod ports;
pub mod scoring;

pub use conversation::{advance, build_prompt, reset, SamplingParams, Tone, CHAT_SAMPLING};
pub use domain::{
    ChatMessage, ChatRole, ConversationHistory, DeedRecord, DeedRow, KarmaSummary, MoodRecord,
    Sentiment, SentimentLabel, Turn,
};
pub use ports::{
    ChatCompletionService, DeedLog, MoodLog, PortError, PortResult, SentimentService,
};
pub use scoring::{points_for, score, DeedScore};
