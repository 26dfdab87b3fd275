use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use sub_digest::{SummarizeError, Summarizer};

#[derive(Clone, Default)]
pub struct MockSummarizer {
    pub reply: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    rate_limit_on: HashSet<usize>,
    always_rate_limited: bool,
    fail_with_status: Option<u16>,
}

impl MockSummarizer {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Default::default()
        }
    }

    /// Returns a rate-limit error on the given 1-based call numbers.
    pub fn rate_limited_on(mut self, calls: &[usize]) -> Self {
        self.rate_limit_on = calls.iter().copied().collect();
        self
    }

    pub fn always_rate_limited() -> Self {
        Self {
            always_rate_limited: true,
            ..Default::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Default::default()
        }
    }
}

impl Summarizer for MockSummarizer {
    const SUMMARIZER_MODEL: &'static str = "mock-model";

    async fn summarize(
        &self,
        prompt: &str,
        _max_output_tokens: u32,
    ) -> Result<String, SummarizeError> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(prompt.to_string());
            calls.len()
        };

        if self.always_rate_limited || self.rate_limit_on.contains(&call_number) {
            return Err(SummarizeError::RateLimited { retry_after: None });
        }
        if let Some(status) = self.fail_with_status {
            return Err(SummarizeError::Api {
                status,
                message: "mock upstream failure".into(),
            });
        }

        Ok(self.reply.clone())
    }
}
