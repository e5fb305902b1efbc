/// Feedback Client — asks an OpenAI-compatible chat-completion service (Groq by default)
/// to review a resume against a job description.
///
/// Failures are reported as `FeedbackError`; the analysis pipeline decides how to degrade.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

use prompts::{
    FEEDBACK_INSTRUCTION, JOB_DESCRIPTION_PREFIX, NO_RESUME_MESSAGE, RESUME_PREFIX,
    REVIEWER_SYSTEM,
};

/// The recoverable failure kinds of a feedback call.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response has no completion content")]
    MissingContent,
}

#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    async fn feedback(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<String, FeedbackError>;
}

/// Connection and sampling settings, built from `Config` at startup.
#[derive(Debug, Clone)]
pub struct FeedbackSettings {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, PartialEq)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn first_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message?.content
    }
}

#[derive(Clone)]
pub struct FeedbackClient {
    client: Client,
    settings: FeedbackSettings,
}

impl FeedbackClient {
    pub fn new(settings: FeedbackSettings) -> Result<Self, FeedbackError> {
        Ok(Self {
            client: Client::builder().timeout(settings.timeout).build()?,
            settings,
        })
    }
}

#[async_trait]
impl FeedbackGenerator for FeedbackClient {
    async fn feedback(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<String, FeedbackError> {
        if resume_text.trim().is_empty() {
            return Ok(NO_RESUME_MESSAGE.to_string());
        }

        let request_body = ChatRequest {
            model: &self.settings.model,
            messages: build_messages(resume_text, job_description),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FeedbackError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let content = parsed.first_content().ok_or(FeedbackError::MissingContent)?;

        debug!("Feedback generated ({} chars)", content.len());
        Ok(content.trim().to_string())
    }
}

fn build_messages(resume_text: &str, job_description: Option<&str>) -> Vec<ChatMessage> {
    let mut messages = vec![
        ChatMessage {
            role: "system",
            content: REVIEWER_SYSTEM.to_string(),
        },
        ChatMessage {
            role: "user",
            content: format!("{RESUME_PREFIX}{}", resume_text.trim()),
        },
    ];

    if let Some(jd) = job_description.map(str::trim).filter(|jd| !jd.is_empty()) {
        messages.push(ChatMessage {
            role: "user",
            content: format!("{JOB_DESCRIPTION_PREFIX}{jd}"),
        });
    }

    messages.push(ChatMessage {
        role: "user",
        content: FEEDBACK_INSTRUCTION.to_string(),
    });
    messages
}
