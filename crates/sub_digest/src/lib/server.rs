//! HTTP boundary: `POST /process` runs the digest pipeline for one video URL.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::error::Error;
use crate::llm::summarizer::Summarizer;
use crate::processor::VideoDigester;
use crate::yt::CaptionSource;

#[derive(Debug, Deserialize)]
struct ProcessRequest {
    #[serde(default)]
    url: String,
}

pub async fn serve<C, S>(addr: SocketAddr, digester: VideoDigester<C, S>) -> anyhow::Result<()>
where
    C: CaptionSource + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    let app = Router::new()
        .route("/health", get(health))
        .route("/process", post(process::<C, S>))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(digester));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn process<C, S>(
    State(digester): State<Arc<VideoDigester<C, S>>>,
    Json(body): Json<ProcessRequest>,
) -> Response
where
    C: CaptionSource + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    if body.url.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "URL is required");
    }

    match digester.digest(&body.url).await {
        Ok(digest) => Json(digest).into_response(),
        // the caller can act on these; message text is safe to expose
        Err(e @ (Error::NoContent | Error::Captions(_))) => {
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        // anything else stays generic; stage context lives in the logs
        Err(e) => {
            tracing::error!(error = %e, "Digest request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "server error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
