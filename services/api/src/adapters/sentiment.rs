//! services/api/src/adapters/sentiment.rs
//!
//! Adapter for the sentiment classifier, served over HTTP.
//!
//! The classifier receives `{"inputs": "<text>"}` and answers with the usual
//! text-classification shape: a list of `{label, score}` objects, optionally
//! nested one level deeper when the server batches its inputs.

use async_trait::async_trait;
use karma_core::{
    domain::{Sentiment, SentimentLabel},
    ports::{PortError, PortResult, SentimentService},
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize, Debug, Clone)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ClassifyResponse {
    Flat(Vec<LabelScore>),
    Batched(Vec<Vec<LabelScore>>),
}

impl ClassifyResponse {
    /// The top prediction for the first input.
    fn first(self) -> Option<LabelScore> {
        match self {
            Self::Flat(scores) => scores.into_iter().next(),
            Self::Batched(batches) => batches.into_iter().next()?.into_iter().next(),
        }
    }
}

/// Implements `SentimentService` by POSTing to a classifier endpoint.
#[derive(Clone)]
pub struct HttpSentimentAdapter {
    client: reqwest::Client,
    url: String,
}

impl HttpSentimentAdapter {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl SentimentService for HttpSentimentAdapter {
    async fn classify(&self, text: &str) -> PortResult<Sentiment> {
        let response = self
            .client
            .post(&self.url)
            .json(&ClassifyRequest { inputs: text })
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        parse_top(body)
    }
}

fn parse_top(body: ClassifyResponse) -> PortResult<Sentiment> {
    let top = body.first().ok_or_else(|| {
        PortError::Unexpected("Sentiment classifier returned no predictions.".to_string())
    })?;
    Ok(Sentiment {
        label: SentimentLabel::parse(&top.label),
        confidence: top.score,
    })
}
