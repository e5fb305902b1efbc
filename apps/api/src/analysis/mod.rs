// Resume analysis: the document-to-feedback pipeline and its HTTP entry points.
// Upstream calls go through the `SimilarityScorer` / `FeedbackGenerator` seams held in AppState.

pub mod handlers;
pub mod pipeline;
