use std::sync::Arc;

use crate::config::Config;
use crate::feedback::FeedbackGenerator;
use crate::similarity::SimilarityScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Embedding-similarity backend. Default: `SimilarityClient` against the configured endpoint.
    pub similarity: Arc<dyn SimilarityScorer>,
    /// Resume-review backend. Default: `FeedbackClient` (chat completions).
    pub feedback: Arc<dyn FeedbackGenerator>,
    pub config: Config,
}
