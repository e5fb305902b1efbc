use std::time::Duration;

use anyhow::{Context, Result};

use crate::feedback::FeedbackSettings;

const DEFAULT_SIMILARITY_API_URL: &str =
    "https://api-inference.huggingface.co/models/sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_GROQ_MODEL: &str = "llama3-8b-8192";

/// Application configuration loaded from environment variables.
/// Fails at startup if required credentials are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub similarity_api_url: String,
    pub hf_api_token: String,
    pub groq_api_url: String,
    pub groq_api_key: String,
    pub groq_model: String,
    pub feedback_temperature: f32,
    pub feedback_max_tokens: u32,
    pub upstream_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            similarity_api_url: env_or("SIMILARITY_API_URL", DEFAULT_SIMILARITY_API_URL),
            hf_api_token: require_env("HF_API_TOKEN")?,
            groq_api_url: env_or("GROQ_API_URL", DEFAULT_GROQ_API_URL),
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_model: env_or("GROQ_MODEL", DEFAULT_GROQ_MODEL),
            feedback_temperature: parse_env("FEEDBACK_TEMPERATURE", 0.7)?,
            feedback_max_tokens: parse_env("FEEDBACK_MAX_TOKENS", 500)?,
            upstream_timeout_secs: parse_env("UPSTREAM_TIMEOUT_SECS", 30)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 2 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn feedback_settings(&self) -> FeedbackSettings {
        FeedbackSettings {
            endpoint: self.groq_api_url.clone(),
            api_key: self.groq_api_key.clone(),
            model: self.groq_model.clone(),
            temperature: self.feedback_temperature,
            max_tokens: self.feedback_max_tokens,
            timeout: self.upstream_timeout(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
