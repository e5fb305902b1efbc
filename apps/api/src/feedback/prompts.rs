// Prompt fragments for the resume-review conversation.

pub const REVIEWER_SYSTEM: &str =
    "You are a helpful assistant that reviews resumes and gives suggestions to improve them.";

pub const RESUME_PREFIX: &str = "Here is a resume:\n\n";

pub const JOB_DESCRIPTION_PREFIX: &str = "Here is the job description:\n\n";

pub const FEEDBACK_INSTRUCTION: &str = "Give constructive feedback on how to improve the resume.";

/// Returned without calling the service when there is nothing to review.
pub const NO_RESUME_MESSAGE: &str = "No resume text provided.";
