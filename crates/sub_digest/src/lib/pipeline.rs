//! The chunk → batch-summarize → rollup engine.
//!
//! One run is strictly sequential: every upstream call passes through the
//! shared [`RateLimiter`], rate-limited calls are retried on a bounded loop,
//! and a rate-limit condition that survives those retries restarts batch
//! processing from the current batch (completed summaries are kept). The
//! rollup is at most two levels deep: an oversized combined text is
//! re-chunked once, its sections condensed, and a single final call produces
//! the digest summary.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::time::{sleep, Duration};

use crate::chunker;
use crate::error::Error;
use crate::llm::summarizer::Summarizer;
use crate::rate_limit::RateLimiter;
use crate::tokens::estimate_tokens;

/// Cooldown before retrying a rate-limited call.
const RETRY_COOLDOWN: Duration = Duration::from_secs(30);
/// Pause between batches.
const BATCH_DELAY: Duration = Duration::from_secs(15);
/// Pause between rollup sections.
const SECTION_DELAY: Duration = Duration::from_secs(5);

/// Max upstream attempts per call before giving up on a rate limit.
const MAX_CALL_ATTEMPTS: u32 = 5;
/// Max batch restarts per run once call-level retries are exhausted.
const MAX_BATCH_RESTARTS: u32 = 3;
/// Max re-chunking depth for sections over the prompt ceiling.
const MAX_SECTION_DEPTH: u8 = 2;

const SECTION_MAX_OUTPUT_TOKENS: u32 = 500;
const FINAL_MAX_OUTPUT_TOKENS: u32 = 1000;

fn section_prompt(title: &str, section: &str) -> String {
    format!("動画「{title}」の字幕セクションを簡潔に要約してください（200字以内）:\n\n{section}")
}

fn final_prompt(title: &str, combined_summaries: &str) -> String {
    format!(
        "動画「{title}」の各セクションの要約を元に、全体を簡潔に要約してください（500字以内）:\n\n{combined_summaries}"
    )
}

fn partial_final_prompt(title: &str, section_summaries: &str) -> String {
    format!(
        "動画「{title}」の部分的な要約を元に、全体を簡潔に要約してください（500字以内）:\n\n{section_summaries}"
    )
}

pub struct DigestPipeline<S> {
    pub(crate) summarizer: S,
    pub(crate) rate_limiter: Arc<RateLimiter>,
    pub(crate) chunk_budget: usize,
    pub(crate) prompt_ceiling: usize,
    pub(crate) batch_size: usize,
    pub(crate) max_call_attempts: u32,
}

impl<S> DigestPipeline<S>
where
    S: Summarizer + Send + Sync,
{
    pub fn new(summarizer: S, rate_limiter: Arc<RateLimiter>) -> Self {
        DigestPipeline {
            summarizer,
            rate_limiter,
            chunk_budget: chunker::CHUNK_BUDGET_DEFAULT,
            prompt_ceiling: chunker::PROMPT_TOKEN_CEILING,
            batch_size: 1,
            max_call_attempts: MAX_CALL_ATTEMPTS,
        }
    }

    /// Runs the full pipeline over one subtitle track.
    ///
    /// Empty input short-circuits to [`Error::NoContent`] before any
    /// upstream call is made.
    #[tracing::instrument(skip(self, subtitle_text))]
    pub async fn run(&self, title: &str, subtitle_text: &str) -> Result<String, Error> {
        if subtitle_text.trim().is_empty() {
            return Err(Error::NoContent);
        }

        let sections = chunker::split(subtitle_text, self.chunk_budget);
        if sections.is_empty() {
            return Err(Error::NoContent);
        }
        tracing::info!(count = sections.len(), "Split subtitles into sections");

        let summaries = self.summarize_batches(title, &sections).await?;

        tracing::info!("Generating final summary");
        self.summarize_all(title, &summaries).await
    }

    /// One gated upstream call with the bounded rate-limit retry policy.
    async fn call_with_retry(
        &self,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, Error> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            self.rate_limiter
                .wait_if_needed(estimate_tokens(prompt))
                .await;

            match self.summarizer.summarize(prompt, max_output_tokens).await {
                Ok(summary) => return Ok(summary),
                Err(e) if e.is_rate_limit() => {
                    if attempts >= self.max_call_attempts {
                        return Err(Error::RateLimitExhausted { attempts });
                    }
                    tracing::warn!(
                        attempts,
                        cooldown_secs = RETRY_COOLDOWN.as_secs(),
                        "Rate limit hit, cooling down before retry"
                    );
                    sleep(RETRY_COOLDOWN).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Summarization call failed");
                    return Err(e.into());
                }
            }
        }
    }

    /// Summarizes one section, re-chunking it first if it exceeds the prompt
    /// ceiling. The explicit `depth` guard caps the descent so the rollup
    /// stays at most two levels deep.
    fn summarize_section<'a>(
        &'a self,
        title: &'a str,
        section: &'a str,
        depth: u8,
    ) -> Pin<Box<dyn Future<Output = Result<String, Error>> + Send + 'a>> {
        Box::pin(async move {
            if estimate_tokens(section) > self.prompt_ceiling as f64 && depth < MAX_SECTION_DEPTH {
                let subsections = chunker::split(section, self.prompt_ceiling);
                let mut parts = Vec::with_capacity(subsections.len());
                for subsection in &subsections {
                    parts.push(self.summarize_section(title, subsection, depth + 1).await?);
                }
                return Ok(parts.join(" "));
            }

            let prompt = section_prompt(title, section);
            self.call_with_retry(&prompt, SECTION_MAX_OUTPUT_TOKENS).await
        })
    }

    /// Summarizes every section in order, in fixed-size batches.
    ///
    /// A rate-limit condition that survives call-level retries restarts
    /// processing from the current batch; summaries of earlier batches are
    /// kept, never redone.
    #[tracing::instrument(skip_all)]
    async fn summarize_batches(
        &self,
        title: &str,
        sections: &[String],
    ) -> Result<Vec<String>, Error> {
        let total_batches = sections.len().div_ceil(self.batch_size);
        let mut summaries = Vec::with_capacity(sections.len());
        let mut index = 0;
        let mut restarts = 0;

        while index < sections.len() {
            let end = (index + self.batch_size).min(sections.len());
            tracing::info!(
                batch = index / self.batch_size + 1,
                total_batches,
                "Processing batch"
            );

            let mut batch_summaries = Vec::with_capacity(end - index);
            let mut restarted = false;
            for (offset, section) in sections[index..end].iter().enumerate() {
                match self.summarize_section(title, section, 0).await {
                    Ok(summary) => {
                        batch_summaries.push(summary);
                        tracing::info!(
                            completed = index + offset + 1,
                            total = sections.len(),
                            "Completed section"
                        );
                    }
                    Err(Error::RateLimitExhausted { attempts })
                        if restarts < MAX_BATCH_RESTARTS =>
                    {
                        restarts += 1;
                        tracing::warn!(
                            attempts,
                            restarts,
                            "Rate limit persisted, restarting from current batch"
                        );
                        sleep(RETRY_COOLDOWN).await;
                        restarted = true;
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
            if restarted {
                continue;
            }

            summaries.extend(batch_summaries);
            index = end;
            if index < sections.len() {
                sleep(BATCH_DELAY).await;
            }
        }

        Ok(summaries)
    }

    /// Reduces the chunk summaries to the final digest summary.
    #[tracing::instrument(skip_all)]
    async fn summarize_all(&self, title: &str, summaries: &[String]) -> Result<String, Error> {
        let combined = summaries.join("\n\n");

        if estimate_tokens(&combined) > self.prompt_ceiling as f64 {
            // second reduction level: condense ceiling-sized sections of the
            // combined summaries, then one final call over those
            let sections = chunker::split(&combined, self.prompt_ceiling);
            let mut section_summaries = Vec::with_capacity(sections.len());
            for (i, section) in sections.iter().enumerate() {
                tracing::info!(
                    section = i + 1,
                    total = sections.len(),
                    "Processing final summary section"
                );
                section_summaries.push(
                    self.summarize_section(title, section, MAX_SECTION_DEPTH)
                        .await?,
                );
                if i + 1 < sections.len() {
                    sleep(SECTION_DELAY).await;
                }
            }

            let prompt = partial_final_prompt(title, &section_summaries.join("\n\n"));
            return self.call_with_retry(&prompt, FINAL_MAX_OUTPUT_TOKENS).await;
        }

        let prompt = final_prompt(title, &combined);
        self.call_with_retry(&prompt, FINAL_MAX_OUTPUT_TOKENS).await
    }
}
