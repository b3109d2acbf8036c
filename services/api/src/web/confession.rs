//! services/api/src/web/confession.rs
//!
//! The confession bot endpoints. The conversation lives in the caller's session.

use axum::{extract::State, http::StatusCode, Extension, Json};
use karma_core::{conversation, ConversationHistory, Tone};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::web::{port_failure, session::CurrentSession, state::AppState};

#[derive(Deserialize, ToSchema)]
pub struct ConfessionRequest {
    #[serde(default)]
    pub message: String,
    /// One of Empathetic, Sassy, Wholesome, Therapist. Anything else means Empathetic.
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TurnView {
    pub user: String,
    pub assistant: String,
}

#[derive(Serialize, ToSchema)]
pub struct ConversationResponse {
    /// The bot's answer to this request, absent when nothing was sent.
    pub reply: Option<String>,
    pub turns: Vec<TurnView>,
}

fn turns_of(history: &ConversationHistory) -> Vec<TurnView> {
    history
        .turns()
        .iter()
        .map(|t| TurnView {
            user: t.user().to_string(),
            assistant: t.assistant().to_string(),
        })
        .collect()
}

/// GET /confession - The conversation so far
#[utoipa::path(
    get,
    path = "/confession",
    responses((status = 200, description = "Conversation history", body = ConversationResponse))
)]
pub async fn conversation_handler(
    Extension(session): Extension<CurrentSession>,
) -> Json<ConversationResponse> {
    let data = session.handle.lock().await;
    Json(ConversationResponse {
        reply: None,
        turns: turns_of(&data.history),
    })
}

/// POST /confession - Send a message to the bot
#[utoipa::path(
    post,
    path = "/confession",
    request_body = ConfessionRequest,
    responses(
        (status = 200, description = "The reply and updated history", body = ConversationResponse),
        (status = 500, description = "Chat model failed")
    )
)]
pub async fn confess_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
    Json(req): Json<ConfessionRequest>,
) -> Result<Json<ConversationResponse>, (StatusCode, String)> {
    let tone = Tone::from_label(req.tone.as_deref().unwrap_or_default());

    // Held across the model call so two requests from one session cannot
    // interleave their history updates.
    let mut data = session.handle.lock().await;

    // Blank messages are dropped here and never reach the model.
    let reply = if req.message.trim().is_empty() {
        None
    } else {
        let reply = conversation::advance(&mut data.history, state.chat.as_ref(), &req.message, tone)
            .await
            .map_err(|e| port_failure("Confession bot failed", e))?;
        if data.history.take_modified() {
            debug!(session = %session.id, turns = data.history.len(), "Conversation updated");
        }
        Some(reply)
    };

    Ok(Json(ConversationResponse {
        reply,
        turns: turns_of(&data.history),
    }))
}

/// POST /confession/reset - Forget the conversation
#[utoipa::path(
    post,
    path = "/confession/reset",
    responses((status = 200, description = "Conversation cleared", body = ConversationResponse))
)]
pub async fn reset_handler(
    Extension(session): Extension<CurrentSession>,
) -> Json<ConversationResponse> {
    let mut data = session.handle.lock().await;
    conversation::reset(&mut data.history);
    data.history.take_modified();
    info!(session = %session.id, "Conversation cleared");
    Json(ConversationResponse {
        reply: None,
        turns: Vec::new(),
    })
}
