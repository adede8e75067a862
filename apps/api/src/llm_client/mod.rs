/// LLM Client — the generative backend seam for the optimizer.
///
/// The optimizer only ever sees `TextGenerator`: a prompt goes in, free-form
/// text comes out. `LlmClient` is the production implementation over the
/// Anthropic Messages API; tests substitute their own doubles.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all optimization calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 1024;
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Every way a backend call can fail. The optimizer treats all of them the
/// same: the section falls back.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("backend call timed out")]
    Timeout,

    #[error("backend quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("backend returned empty content")]
    EmptyContent,

    #[error("backend call cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(e.to_string())
        }
    }
}

/// The opaque generative capability: `generate(prompt) -> text`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client.
///
/// Makes exactly one HTTP request per `generate` call. Retry policy lives in
/// the pipeline, where it is capped and paced.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { client, api_key })
    }

    async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            input_tokens = llm_response.usage.input_tokens,
            output_tokens = llm_response.usage.output_tokens,
            "LLM call succeeded"
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, prompts::RESUME_WRITER_SYSTEM).await?;
        response
            .text()
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

/// Maps a non-success HTTP status to the backend error taxonomy.
fn classify_status(status: StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<AnthropicError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        429 => LlmError::QuotaExceeded(message),
        408 | 504 => LlmError::Timeout,
        code => LlmError::Service {
            status: code,
            message,
        },
    }
}
