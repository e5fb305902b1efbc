//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::analysis::pipeline::{run_analysis, AnalysisResult, Submission};
use crate::errors::AppError;
use crate::extract::UploadedFile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

/// POST /analyze
///
/// Form submission with `resume_text`, `resume_file` and `job_description` parts.
pub async fn handle_analyze_form(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let submission = read_submission(multipart).await?;
    let result = run_analysis(submission, state.similarity.as_ref(), state.feedback.as_ref()).await?;
    Ok(Json(result))
}

/// POST /api/v1/analyze
///
/// JSON variant for callers that already have the resume as text.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let submission = Submission {
        resume_text: Some(request.resume_text),
        resume_file: None,
        job_description: request.job_description,
    };
    let result = run_analysis(submission, state.similarity.as_ref(), state.feedback.as_ref()).await?;
    Ok(Json(result))
}

/// Buffers the multipart form into a `Submission`. Each part is read exactly once.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Malformed form data"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume_text" => submission.resume_text = Some(read_text(field).await?),
            "job_description" => submission.job_description = read_text(field).await?,
            "resume_file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "Could not read upload"))?;
                // Browsers send an empty, unnamed part when no file was chosen.
                if !filename.is_empty() {
                    debug!(filename = %filename, bytes = data.len(), "Received resume upload");
                    submission.resume_file = Some(UploadedFile::new(filename, data));
                }
            }
            other => debug!("Ignoring unexpected form field '{other}'"),
        }
    }

    Ok(submission)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| multipart_error(e, "Could not read form field"))
}

fn multipart_error(err: MultipartError, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(format!("{context}: {}", err.body_text()))
    }
}
