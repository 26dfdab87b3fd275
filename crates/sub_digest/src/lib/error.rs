use crate::llm::summarizer::SummarizeError;

/// Pipeline-level failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No subtitle text to work with; surfaced before any upstream call.
    #[error("no subtitle content to summarize")]
    NoContent,
    /// Upstream throttling persisted through every bounded retry.
    #[error("still rate limited after {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },
    /// Any non-rate-limit failure of the summarization call.
    #[error("summarization failed: {0}")]
    Summarize(#[from] SummarizeError),
    /// The caption collaborator could not produce subtitle text.
    #[error("caption extraction failed: {0}")]
    Captions(#[source] anyhow::Error),
}
