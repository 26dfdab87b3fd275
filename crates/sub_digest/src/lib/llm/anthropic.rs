use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{SummarizeError, Summarizer};

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub async fn send_message_request(
        &self,
        model_name: impl Into<String>,
        user_content: impl Into<String>,
        max_tokens: u32,
    ) -> Result<MessageResponse, SummarizeError> {
        let body = serde_json::json!({
            "model": model_name.into(),
            "max_tokens": max_tokens,
            "messages": [
                {
                    "role": "user",
                    "content": user_content.into()
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            return Err(SummarizeError::RateLimited { retry_after });
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(SummarizeError::Api { status, message });
        }

        Ok(resp.json::<MessageResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

impl Summarizer for AnthropicClient {
    const SUMMARIZER_MODEL: &'static str = "claude-3-opus-20240229";

    async fn summarize(
        &self,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String, SummarizeError> {
        let response = self
            .send_message_request(Self::SUMMARIZER_MODEL, prompt, max_output_tokens)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        let summary = response
            .content
            .iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text.clone())
            .ok_or(SummarizeError::EmptyCompletion)?;

        Ok(summary)
    }
}
