pub mod chunker;
mod error;
mod llm;
mod pipeline;
mod processor;
pub mod rate_limit;
pub mod server;
pub mod tokens;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::Error;
pub use llm::anthropic::AnthropicClient;
pub use llm::summarizer::{SummarizeError, Summarizer};
pub use pipeline::DigestPipeline;
pub use processor::{builder::VideoDigesterBuilder, VideoDigester};
pub use rate_limit::RateLimiter;
pub use types::{Digest, VideoCaptions};
