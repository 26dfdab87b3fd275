use std::future::Future;

/// Failure of one upstream summarization call.
///
/// Rate limiting is a dedicated variant set at the HTTP boundary (status
/// 429), so retry policy never depends on matching error message text.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("upstream rate limit hit")]
    RateLimited {
        /// `Retry-After` seconds, when the upstream provided one.
        retry_after: Option<u64>,
    },
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("no content in completion response")]
    EmptyCompletion,
}

impl SummarizeError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, SummarizeError::RateLimited { .. })
    }
}

/// A single "summarize this prompt" call against an external model.
///
/// Implementations perform exactly one upstream request per invocation;
/// pacing, budgeting and retries are the pipeline's concern.
pub trait Summarizer {
    const SUMMARIZER_MODEL: &'static str;

    fn summarize(
        &self,
        prompt: &str,
        max_output_tokens: u32,
    ) -> impl Future<Output = Result<String, SummarizeError>> + Send;
}
