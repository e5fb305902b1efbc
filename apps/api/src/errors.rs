use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::pipeline::AnalysisError;
use crate::extract::ExtractionError;
use crate::similarity::SimilarityError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Upload exceeds the maximum request size")]
    PayloadTooLarge,

    #[error("Similarity error: {0}")]
    UpstreamSimilarity(SimilarityError),
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::ClientInput(msg) => AppError::Validation(msg),
            AnalysisError::Extraction(e) => AppError::Extraction(e),
            AnalysisError::UpstreamSimilarity(e) => AppError::UpstreamSimilarity(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Extraction(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UpstreamSimilarity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::Extraction(e) => (
                "EXTRACTION_ERROR",
                format!("Could not read the uploaded resume: {e}"),
            ),
            AppError::PayloadTooLarge => ("PAYLOAD_TOO_LARGE", self.to_string()),
            AppError::UpstreamSimilarity(e) => {
                tracing::error!("Similarity service error: {e}");
                (
                    "SIMILARITY_ERROR",
                    "Error occurred while calculating similarity".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
