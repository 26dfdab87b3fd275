use std::sync::Arc;

use crate::chunker;
use crate::llm::summarizer::Summarizer;
use crate::pipeline::DigestPipeline;
use crate::processor::VideoDigester;
use crate::rate_limit::RateLimiter;
use crate::yt::CaptionSource;

pub struct VideoDigesterBuilder<C = (), S = ()> {
    caption_source: C,
    summarizer: S,
    rate_limiter: Option<Arc<RateLimiter>>,
    chunk_budget: usize,
    prompt_ceiling: usize,
    batch_size: usize,
    max_call_attempts: Option<u32>,
}

impl Default for VideoDigesterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoDigesterBuilder {
    pub fn new() -> Self {
        Self {
            caption_source: (),
            summarizer: (),
            rate_limiter: None,
            chunk_budget: chunker::CHUNK_BUDGET_DEFAULT,
            prompt_ceiling: chunker::PROMPT_TOKEN_CEILING,
            batch_size: 1,
            max_call_attempts: None,
        }
    }
}

impl<C, S> VideoDigesterBuilder<C, S> {
    pub fn caption_source<C2: CaptionSource + Send + Sync + 'static>(
        self,
        caption_source: C2,
    ) -> VideoDigesterBuilder<C2, S> {
        VideoDigesterBuilder {
            caption_source,
            summarizer: self.summarizer,
            rate_limiter: self.rate_limiter,
            chunk_budget: self.chunk_budget,
            prompt_ceiling: self.prompt_ceiling,
            batch_size: self.batch_size,
            max_call_attempts: self.max_call_attempts,
        }
    }

    pub fn summarizer<S2: Summarizer + Send + Sync + 'static>(
        self,
        summarizer: S2,
    ) -> VideoDigesterBuilder<C, S2> {
        VideoDigesterBuilder {
            caption_source: self.caption_source,
            summarizer,
            rate_limiter: self.rate_limiter,
            chunk_budget: self.chunk_budget,
            prompt_ceiling: self.prompt_ceiling,
            batch_size: self.batch_size,
            max_call_attempts: self.max_call_attempts,
        }
    }

    /// Shares an externally constructed rate limiter; otherwise a fresh one
    /// with the default budget is created at build time.
    pub fn rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }

    pub fn chunk_budget(mut self, chunk_budget: usize) -> Self {
        self.chunk_budget = chunk_budget;
        self
    }

    pub fn prompt_ceiling(mut self, prompt_ceiling: usize) -> Self {
        self.prompt_ceiling = prompt_ceiling;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn max_call_attempts(mut self, max_call_attempts: u32) -> Self {
        self.max_call_attempts = Some(max_call_attempts.max(1));
        self
    }
}

impl<C, S> VideoDigesterBuilder<C, S>
where
    C: CaptionSource + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    pub fn build(self) -> VideoDigester<C, S> {
        let rate_limiter = self
            .rate_limiter
            .unwrap_or_else(|| Arc::new(RateLimiter::default()));

        let mut pipeline = DigestPipeline::new(self.summarizer, rate_limiter);
        pipeline.chunk_budget = self.chunk_budget;
        pipeline.prompt_ceiling = self.prompt_ceiling;
        pipeline.batch_size = self.batch_size;
        if let Some(attempts) = self.max_call_attempts {
            pipeline.max_call_attempts = attempts;
        }

        VideoDigester {
            caption_source: self.caption_source,
            pipeline,
        }
    }
}
