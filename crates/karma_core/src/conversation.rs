//! crates/karma_core/src/conversation.rs
//!
//! The confession bot: tone presets and the per-session turn accumulator.
//!
//! Every call rebuilds the full prompt from the session's history. There is no
//! windowing, so prompt size grows with the length of the conversation.

use tracing::debug;

use crate::domain::{ChatMessage, ConversationHistory, Turn};
use crate::ports::{ChatCompletionService, PortResult};

/// Sampling settings forwarded to the chat service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

pub const CHAT_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.7,
    max_tokens: 512,
};

/// Style preset selecting the system instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Empathetic,
    Sassy,
    Wholesome,
    Therapist,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Empathetic, Tone::Sassy, Tone::Wholesome, Tone::Therapist];

    /// Resolves a form label, ignoring ASCII case (`"sassy"` is `Sassy`).
    /// Unknown labels fall back to `Empathetic`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|tone| tone.label().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            Tone::Empathetic => "Empathetic",
            Tone::Sassy => "Sassy",
            Tone::Wholesome => "Wholesome",
            Tone::Therapist => "Therapist",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Tone::Empathetic => "You're a kind, understanding listener.",
            Tone::Sassy => "You're witty and a little sarcastic.",
            Tone::Wholesome => "You're friendly and positive.",
            Tone::Therapist => "You're calm, thoughtful, and sound like a therapist.",
        }
    }
}

/// System instruction, then each past turn oldest first, then `message`.
pub fn build_prompt(history: &ConversationHistory, tone: Tone, message: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::system(tone.instruction()));
    for turn in history.turns() {
        messages.push(ChatMessage::user(turn.user()));
        messages.push(ChatMessage::assistant(turn.assistant()));
    }
    messages.push(ChatMessage::user(message));
    messages
}

/// Sends `message` with the full history and records the exchange.
///
/// On failure the history is left untouched.
pub async fn advance(
    history: &mut ConversationHistory,
    chat: &dyn ChatCompletionService,
    message: &str,
    tone: Tone,
) -> PortResult<String> {
    let prompt = build_prompt(history, tone, message);
    debug!(prior_turns = history.len(), tone = tone.label(), "Building confession prompt");

    let reply = chat.complete(&prompt, CHAT_SAMPLING).await?.trim().to_string();

    history.push(Turn::new(message, reply.clone()));
    Ok(reply)
}

/// Drops every turn.
pub fn reset(history: &mut ConversationHistory) {
    history.clear();
}
