mod analysis;
mod config;
mod errors;
mod extract;
mod feedback;
mod routes;
mod similarity;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::feedback::FeedbackClient;
use crate::routes::build_router;
use crate::similarity::SimilarityClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    let similarity = SimilarityClient::new(
        config.similarity_api_url.clone(),
        config.hf_api_token.clone(),
        config.upstream_timeout(),
    )
    .context("Failed to build similarity HTTP client")?;
    info!("Similarity client initialized ({})", config.similarity_api_url);

    let feedback = FeedbackClient::new(config.feedback_settings())
        .context("Failed to build feedback HTTP client")?;
    info!("Feedback client initialized (model: {})", config.groq_model);

    let state = AppState {
        similarity: Arc::new(similarity),
        feedback: Arc::new(feedback),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
