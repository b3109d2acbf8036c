//! Drives the full router with fake model services and temp-dir record logs.

use std::sync::{Arc, Mutex};

use api_lib::{
    adapters::{CsvDeedLog, CsvMoodLog, QuoteBook},
    config::{Config, Credentials},
    web::{self, session::SessionStore, state::AppState},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use karma_core::{
    ChatCompletionService, ChatMessage, PortError, PortResult, SamplingParams, Sentiment,
    SentimentLabel, SentimentService,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct KeywordClassifier;

#[async_trait]
impl SentimentService for KeywordClassifier {
    async fn classify(&self, text: &str) -> PortResult<Sentiment> {
        if text.contains("offline") {
            return Err(PortError::Unexpected("classifier down".into()));
        }
        let (label, confidence) = if text.contains("helped") {
            ("POSITIVE", 0.82)
        } else if text.contains("yelled") {
            ("NEGATIVE", 0.55)
        } else {
            ("NEUTRAL", 0.9)
        };
        Ok(Sentiment {
            label: SentimentLabel::parse(label),
            confidence,
        })
    }
}

#[derive(Default)]
struct CountingChat {
    prompt_lengths: Mutex<Vec<usize>>,
}

#[async_trait]
impl ChatCompletionService for CountingChat {
    async fn complete(&self, messages: &[ChatMessage], _: SamplingParams) -> PortResult<String> {
        let mut lengths = self.prompt_lengths.lock().unwrap();
        lengths.push(messages.len());
        Ok(format!(" I hear you ({}) ", lengths.len()))
    }
}

struct Harness {
    app: Router,
    chat: Arc<CountingChat>,
    _dir: TempDir,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        log_level: tracing::Level::INFO,
        credentials: Credentials {
            email: "test@karma.com".into(),
            password: "1234".into(),
            display_name: "User".into(),
        },
        session_secret: "test-secret-test-secret".into(),
        deeds_file: dir.path().join("data").join("deeds.csv"),
        mood_file: dir.path().join("moods.csv"),
        quotes_file: dir.path().join("quotes.csv"),
        chat_api_base: "http://unused".into(),
        chat_api_key: None,
        chat_model: "fake".into(),
        sentiment_url: "http://unused".into(),
    };
    std::fs::write(&config.quotes_file, "quote\nStay kind.\n").unwrap();

    let chat = Arc::new(CountingChat::default());
    let state = Arc::new(AppState {
        sessions: Arc::new(SessionStore::new(config.session_secret.clone())),
        deeds: Arc::new(CsvDeedLog::new(config.deeds_file.clone())),
        moods: Arc::new(CsvMoodLog::new(config.mood_file.clone())),
        quotes: QuoteBook::new(config.quotes_file.clone()),
        sentiment: Arc::new(KeywordClassifier),
        chat: chat.clone(),
        config: Arc::new(config),
    });
    Harness {
        app: web::router(state),
        chat,
        _dir: dir,
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, set_cookie, value)
}

async fn login(app: &Router) -> String {
    let (status, set_cookie, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "test@karma.com", "password": "1234"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_name"], "User");
    set_cookie.unwrap().split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn protected_routes_require_login() {
    let h = harness();
    for uri in ["/dashboard", "/karma", "/mood", "/confession"] {
        let (status, _, _) = send(&h.app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
    let (status, _, _) = send(&h.app, "GET", "/karma", Some("session=forged.cookie"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let h = harness();
    let (status, set_cookie, _) = send(
        &h.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "test@karma.com", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(set_cookie.is_none());
}

#[tokio::test]
async fn dashboard_greets_with_a_quote() {
    let h = harness();
    let cookie = login(&h.app).await;
    let (status, _, body) = send(&h.app, "GET", "/dashboard", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quote"], "Stay kind.");
}

#[tokio::test]
async fn deeds_are_scored_totalled_and_deleted() {
    let h = harness();
    let cookie = login(&h.app).await;

    send(&h.app, "POST", "/karma", Some(&cookie), Some(json!({"deed": "  helped a stranger "}))).await;
    send(&h.app, "POST", "/karma", Some(&cookie), Some(json!({"deed": "yelled at traffic"}))).await;
    let (_, _, body) = send(&h.app, "POST", "/karma", Some(&cookie), Some(json!({"deed": "   "}))).await;

    assert_eq!(body["deeds"].as_array().unwrap().len(), 2);
    assert_eq!(body["deeds"][0]["text"], "helped a stranger");
    assert_eq!(body["deeds"][0]["points"], 8);
    assert!(body["deeds"][0]["reason"].as_str().unwrap().contains("0.82"));
    assert_eq!(body["deeds"][1]["points"], -6);
    assert_eq!(body["total_points"], 2);
    assert_eq!(body["progress_percent"], 20);

    let (status, _, body) = send(&h.app, "POST", "/karma/0/delete", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_points"], -6);
    assert_eq!(body["progress_percent"], 0);
    assert_eq!(body["deeds"][0]["id"], 0);
}

#[tokio::test]
async fn classifier_failure_fails_only_that_request() {
    let h = harness();
    let cookie = login(&h.app).await;
    let (status, _, _) =
        send(&h.app, "POST", "/karma", Some(&cookie), Some(json!({"deed": "offline deed"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _, body) = send(&h.app, "GET", "/karma", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["deeds"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn moods_without_emoji_are_ignored() {
    let h = harness();
    let cookie = login(&h.app).await;

    let (_, _, body) =
        send(&h.app, "POST", "/mood", Some(&cookie), Some(json!({"note": "no emoji"}))).await;
    assert!(body["moods"].as_array().unwrap().is_empty());

    let (_, _, body) = send(
        &h.app,
        "POST",
        "/mood",
        Some(&cookie),
        Some(json!({"emoji": "🙂", "note": "  calm  "})),
    )
    .await;
    let mood = &body["moods"][0];
    assert_eq!(mood["note"], "calm");
    let timestamp = mood["timestamp"].as_str().unwrap().to_string();
    assert_eq!(timestamp.len(), "2024-01-01 10:00:00".len());

    let (_, _, body) = send(
        &h.app,
        "POST",
        "/mood/delete",
        Some(&cookie),
        Some(json!({"timestamp": timestamp})),
    )
    .await;
    assert!(body["moods"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn confession_history_grows_resets_and_dies_with_the_session() {
    let h = harness();
    let cookie = login(&h.app).await;

    for _ in 0..3 {
        let (status, _, _) = send(
            &h.app,
            "POST",
            "/confession",
            Some(&cookie),
            Some(json!({"message": "I ate the last cookie", "tone": "Sassy"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, _, body) = send(&h.app, "GET", "/confession", Some(&cookie), None).await;
    assert_eq!(body["turns"].as_array().unwrap().len(), 3);
    assert_eq!(body["turns"][2]["assistant"], "I hear you (3)");

    send(&h.app, "POST", "/confession/reset", Some(&cookie), None).await;
    let (_, _, body) = send(
        &h.app,
        "POST",
        "/confession",
        Some(&cookie),
        Some(json!({"message": "starting over"})),
    )
    .await;
    assert_eq!(body["reply"], "I hear you (4)");
    assert_eq!(body["turns"].as_array().unwrap().len(), 1);
    assert_eq!(*h.chat.prompt_lengths.lock().unwrap(), vec![2, 4, 6, 2]);

    send(&h.app, "POST", "/auth/logout", Some(&cookie), None).await;
    let (status, _, _) = send(&h.app, "GET", "/confession", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logging_in_again_retires_the_old_session() {
    let h = harness();
    let first = login(&h.app).await;
    send(
        &h.app,
        "POST",
        "/confession",
        Some(&first),
        Some(json!({"message": "remember me"})),
    )
    .await;

    let second = login(&h.app).await;
    let (status, _, _) = send(&h.app, "GET", "/confession", Some(&first), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = send(&h.app, "GET", "/confession", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["turns"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn blank_confession_never_reaches_the_model() {
    let h = harness();
    let cookie = login(&h.app).await;
    let (status, _, body) = send(
        &h.app,
        "POST",
        "/confession",
        Some(&cookie),
        Some(json!({"message": "   ", "tone": "Therapist"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].is_null());
    assert!(body["turns"].as_array().unwrap().is_empty());
    assert!(h.chat.prompt_lengths.lock().unwrap().is_empty());
}
