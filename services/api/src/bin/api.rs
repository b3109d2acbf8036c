//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{CsvDeedLog, CsvMoodLog, HttpSentimentAdapter, OpenAiChatAdapter, QuoteBook},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, session::SessionStore, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Record Logs ---
    info!(
        deeds = %config.deeds_file.display(),
        moods = %config.mood_file.display(),
        "Using flat-file record logs"
    );
    let deeds = Arc::new(CsvDeedLog::new(config.deeds_file.clone()));
    let moods = Arc::new(CsvMoodLog::new(config.mood_file.clone()));
    let quotes = QuoteBook::new(config.quotes_file.clone());

    // --- 3. Initialize Model Adapters ---
    let mut openai_config = OpenAIConfig::new().with_api_base(&config.chat_api_base);
    if let Some(key) = &config.chat_api_key {
        openai_config = openai_config.with_api_key(key);
    }
    let chat = Arc::new(OpenAiChatAdapter::new(
        Client::with_config(openai_config),
        config.chat_model.clone(),
    ));
    info!("Chat model '{}' at {}", config.chat_model, config.chat_api_base);

    let sentiment = Arc::new(HttpSentimentAdapter::new(
        reqwest::Client::new(),
        config.sentiment_url.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        sessions: Arc::new(SessionStore::new(config.session_secret.clone())),
        deeds,
        moods,
        quotes,
        sentiment,
        chat,
    });

    let allowed_origin = format!("http://localhost:{}", config.bind_address.port())
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(web::router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
