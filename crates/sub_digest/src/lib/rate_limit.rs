//! Token-per-minute throttling for upstream summarization calls.
//!
//! One [`RateLimiter`] is constructed at process start and shared (via
//! `Arc`) by everything that issues upstream calls. Consumption is tracked
//! over a fixed one-minute window; callers block until their estimated token
//! spend fits. The lock is held across the sleep, which serializes callers —
//! the pipeline runs a handful of sequential calls, so coarse locking is
//! acceptable here.

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Default token budget per one-minute window.
pub const DEFAULT_TOKENS_PER_MINUTE: usize = 40_000;

const WINDOW: Duration = Duration::from_secs(60);
const MIN_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug)]
struct Window {
    tokens_used: f64,
    window_start: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    tokens_per_minute: f64,
    window: Duration,
    min_delay: Duration,
    state: Mutex<Window>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_TOKENS_PER_MINUTE)
    }
}

impl RateLimiter {
    pub fn new(tokens_per_minute: usize) -> Self {
        RateLimiter {
            tokens_per_minute: tokens_per_minute as f64,
            window: WINDOW,
            min_delay: MIN_DELAY,
            state: Mutex::new(Window {
                tokens_used: 0.0,
                window_start: Instant::now(),
            }),
        }
    }

    /// Blocks until consuming `estimated_tokens` is within budget, then
    /// records the consumption.
    ///
    /// Under-budget calls still pause for the minimum inter-call delay so
    /// request bursts are smoothed out.
    pub async fn wait_if_needed(&self, estimated_tokens: f64) {
        let mut state = self.state.lock().await;

        let now = Instant::now();
        if now.duration_since(state.window_start) >= self.window {
            state.tokens_used = 0.0;
            state.window_start = now;
        }

        if state.tokens_used + estimated_tokens > self.tokens_per_minute {
            let elapsed = now.duration_since(state.window_start);
            let wait = self.window.saturating_sub(elapsed).max(self.min_delay);
            tracing::info!(
                wait_secs = wait.as_secs_f64(),
                "waiting to respect rate limit"
            );
            sleep(wait).await;
            state.tokens_used = 0.0;
            state.window_start = Instant::now();
        } else {
            sleep(self.min_delay).await;
        }

        state.tokens_used += estimated_tokens;
    }
}
