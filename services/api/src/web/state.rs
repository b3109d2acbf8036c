//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::{adapters::QuoteBook, config::Config, web::session::SessionStore};
use karma_core::ports::{ChatCompletionService, DeedLog, MoodLog, SentimentService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub deeds: Arc<dyn DeedLog>,
    pub moods: Arc<dyn MoodLog>,
    pub quotes: QuoteBook,
    pub sentiment: Arc<dyn SentimentService>,
    pub chat: Arc<dyn ChatCompletionService>,
}
