//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// The single account allowed to log in.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

impl Credentials {
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub credentials: Credentials,
    pub session_secret: String,
    pub deeds_file: PathBuf,
    pub mood_file: PathBuf,
    pub quotes_file: PathBuf,
    pub chat_api_base: String,
    pub chat_api_key: Option<String>,
    pub chat_model: String,
    pub sentiment_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Login and Session Secrets ---
        let credentials = Credentials {
            email: required("KARMA_EMAIL")?,
            password: required("KARMA_PASSWORD")?,
            display_name: std::env::var("KARMA_USER_NAME").unwrap_or_else(|_| "User".to_string()),
        };
        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < 16 {
            return Err(ConfigError::InvalidValue(
                "SESSION_SECRET".to_string(),
                "must be at least 16 characters".to_string(),
            ));
        }

        // --- Record Files ---
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let deeds_file = std::env::var("DEEDS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("deeds.csv"));
        let mood_file = std::env::var("MOOD_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("moods.csv"));
        let quotes_file = std::env::var("QUOTES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("quotes.csv"));

        // --- Model Services ---
        let chat_api_base = std::env::var("CHAT_API_BASE")
            .unwrap_or_else(|_| "http://localhost:8080/v1".to_string());
        let chat_api_key = std::env::var("CHAT_API_KEY").ok();
        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "mistral".to_string());
        let sentiment_url = std::env::var("SENTIMENT_URL")
            .unwrap_or_else(|_| "http://localhost:8081/sentiment".to_string());

        Ok(Self {
            bind_address,
            log_level,
            credentials,
            session_secret,
            deeds_file,
            mood_file,
            quotes_file,
            chat_api_base,
            chat_api_key,
            chat_model,
            sentiment_url,
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}
