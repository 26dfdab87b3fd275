use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sub_digest::{
    chunker, server, tracing::init_tracing_subscriber, yt::ytdlp::YtDlpCaptionSource,
    AnthropicClient, RateLimiter, VideoDigesterBuilder,
};

#[derive(Parser)]
#[command(name = "sub-digest", about = "Video subtitle summarizer")]
struct Cli {
    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY")]
    anthropic_key: String,

    /// Token budget per one-minute rate window
    #[arg(long, env = "TOKENS_PER_MINUTE", default_value = "40000")]
    tokens_per_minute: usize,

    /// Per-chunk token budget for subtitle splitting
    #[arg(long, default_value_t = chunker::CHUNK_BUDGET_TOP_LEVEL)]
    chunk_budget: usize,

    /// Sections summarized per batch
    #[arg(long, default_value = "1")]
    batch_size: usize,

    /// Path to the yt-dlp binary
    #[arg(long, env = "YTDLP_BIN", default_value = "yt-dlp")]
    ytdlp_bin: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Digest a single video URL and print the result as JSON
    Run {
        /// Video URL
        url: String,
    },
    /// Start the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5001")]
        addr: SocketAddr,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let rate_limiter = Arc::new(RateLimiter::new(cli.tokens_per_minute));
    let digester = VideoDigesterBuilder::new()
        .caption_source(YtDlpCaptionSource::new(&cli.ytdlp_bin))
        .summarizer(AnthropicClient::new(&cli.anthropic_key))
        .rate_limiter(rate_limiter)
        .chunk_budget(cli.chunk_budget)
        .batch_size(cli.batch_size)
        .build();

    match cli.command {
        Command::Run { url } => {
            tracing::info!(%url, "Digesting video...");
            let digest = digester.digest(&url).await?;
            println!("{}", serde_json::to_string_pretty(&digest)?);
        }
        Command::Serve { addr } => {
            tracing::info!(%addr, "Starting server...");
            server::serve(addr, digester).await?;
        }
    }

    Ok(())
}
