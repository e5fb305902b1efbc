//! Analysis pipeline: resolve resume text → validate → score + feedback → compose result.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::extract::{self, ExtractionError, UploadedFile};
use crate::feedback::{FeedbackError, FeedbackGenerator};
use crate::similarity::{SimilarityError, SimilarityScorer};

/// Length of the resume / job description prefixes echoed back in the result.
pub const PREVIEW_CHARS: usize = 300;

/// One analysis request. Constructed per request and dropped after the response.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub resume_text: Option<String>,
    pub resume_file: Option<UploadedFile>,
    pub job_description: String,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    ClientInput(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("similarity service failed: {0}")]
    UpstreamSimilarity(SimilarityError),
}

impl From<SimilarityError> for AnalysisError {
    fn from(err: SimilarityError) -> Self {
        match err {
            SimilarityError::InvalidInput => AnalysisError::ClientInput(err.to_string()),
            other => AnalysisError::UpstreamSimilarity(other),
        }
    }
}

/// Feedback text plus whether it is real advice or a fallback explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackResult {
    pub text: String,
    pub unavailable: bool,
}

impl FeedbackResult {
    fn from_outcome(outcome: Result<String, FeedbackError>) -> Self {
        match outcome {
            Ok(text) => Self {
                text,
                unavailable: false,
            },
            Err(e) => {
                warn!("Feedback generation failed: {e}");
                Self {
                    text: format!("(Feedback unavailable: {e})"),
                    unavailable: true,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub match_score: f64,
    pub resume_preview: String,
    pub job_preview: String,
    pub feedback: String,
}

/// Runs the full pipeline for one submission.
///
/// Input problems are rejected before any upstream call. A similarity failure aborts the
/// analysis; a feedback failure only changes the `feedback` text.
pub async fn run_analysis(
    submission: Submission,
    scorer: &dyn SimilarityScorer,
    generator: &dyn FeedbackGenerator,
) -> Result<AnalysisResult, AnalysisError> {
    let job_description = submission.job_description.trim().to_string();
    if job_description.is_empty() {
        return Err(missing_input());
    }

    let resume_text = resolve_resume_text(submission.resume_text, submission.resume_file).await?;
    if resume_text.is_empty() {
        return Err(missing_input());
    }

    let (score, feedback) = tokio::join!(
        scorer.score(&job_description, &resume_text),
        generator.feedback(&resume_text, Some(&job_description)),
    );
    let match_score = score?;
    let feedback = FeedbackResult::from_outcome(feedback);

    info!(
        match_score,
        feedback_unavailable = feedback.unavailable,
        "Analysis complete"
    );

    Ok(AnalysisResult {
        match_score,
        resume_preview: preview(&resume_text),
        job_preview: preview(&job_description),
        feedback: feedback.text,
    })
}

fn missing_input() -> AnalysisError {
    AnalysisError::ClientInput("Resume and job description required.".to_string())
}

/// Pasted text wins; otherwise the upload is extracted. Returns trimmed text, possibly empty.
async fn resolve_resume_text(
    pasted: Option<String>,
    file: Option<UploadedFile>,
) -> Result<String, AnalysisError> {
    if let Some(file) = &file {
        if file.format().is_none() {
            return Err(AnalysisError::ClientInput(format!(
                "Unsupported file type: '{}'. Upload a .pdf, .docx or .txt file.",
                file.filename
            )));
        }
    }

    if let Some(text) = pasted.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        return Ok(text);
    }

    let Some(file) = file else {
        return Ok(String::new());
    };

    let filename = file.filename.clone();
    let text = tokio::task::spawn_blocking(move || extract::extract(&file))
        .await
        .map_err(|e| ExtractionError::Worker(e.to_string()))??;

    info!(filename = %filename, chars = text.chars().count(), "Extracted resume text");
    Ok(text.trim().to_string())
}

/// The first `PREVIEW_CHARS` characters of `text`.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
