//! Similarity Client — scores two text spans with a hosted sentence-embedding model.
//!
//! The service takes an anchor sentence and a list of candidates and answers with one cosine
//! similarity per candidate. We always send exactly one candidate, so a well-formed answer is a
//! single-element numeric array.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("both texts must be non-empty")]
    InvalidInput,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected API response format: {0}")]
    Format(String),
}

/// Anything that can produce a 0–100 match score for two texts.
///
/// Carried in `AppState` as `Arc<dyn SimilarityScorer>`.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    async fn score(&self, anchor: &str, candidate: &str) -> Result<f64, SimilarityError>;
}

#[derive(Debug, Serialize)]
struct SimilarityRequest<'a> {
    inputs: SimilarityInputs<'a>,
}

#[derive(Debug, Serialize)]
struct SimilarityInputs<'a> {
    source_sentence: &'a str,
    sentences: [&'a str; 1],
}

#[derive(Clone)]
pub struct SimilarityClient {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl SimilarityClient {
    pub fn new(
        endpoint: String,
        api_token: String,
        timeout: Duration,
    ) -> Result<Self, SimilarityError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
            api_token,
        })
    }
}

#[async_trait]
impl SimilarityScorer for SimilarityClient {
    async fn score(&self, anchor: &str, candidate: &str) -> Result<f64, SimilarityError> {
        if anchor.is_empty() || candidate.is_empty() {
            return Err(SimilarityError::InvalidInput);
        }

        let request_body = SimilarityRequest {
            inputs: SimilarityInputs {
                source_sentence: anchor,
                sentences: [candidate],
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SimilarityError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let similarity = parse_single_score(&body)?;
        debug!("Similarity service returned {similarity}");
        Ok(to_percentage(similarity))
    }
}

/// Accepts only a JSON array holding exactly one finite number.
fn parse_single_score(body: &str) -> Result<f64, SimilarityError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SimilarityError::Format(format!("invalid JSON: {e}")))?;

    match value.as_array().map(Vec::as_slice) {
        Some([single]) => single
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| SimilarityError::Format(format!("non-numeric score: {single}"))),
        Some(items) => Err(SimilarityError::Format(format!(
            "expected 1 score, got {}",
            items.len()
        ))),
        None => Err(SimilarityError::Format(format!("expected an array, got {value}"))),
    }
}

/// Cosine similarity to a percentage with two decimals, clamped to 0–100.
fn to_percentage(similarity: f64) -> f64 {
    ((similarity * 100.0 * 100.0).round() / 100.0).clamp(0.0, 100.0)
}
