//! OpenAI-compatible HTTP implementations of the model seams.
//!
//! Both clients post JSON through the same transport. Every request is bounded by
//! `llm.request_timeout_secs`, enforced at the call site with
//! `tokio::time::timeout` on top of the client-level timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use docent_core::config::DocentConfig;
use docent_core::types::{ChatMessage, ToolCall, ToolDefinition};

use crate::client::{LlmClient, LlmResponse};
use crate::embedding::EmbeddingService;
use crate::error::LlmError;

/// Authenticated JSON transport to an OpenAI-compatible API.
#[derive(Clone)]
struct Transport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Transport {
    fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docent/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, LlmError> {
        let url = format!("{}/{}", self.base_url, path);
        let secs = self.timeout.as_secs();

        let request = async {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await?;
            if !status.is_success() {
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: api_error_message(&text),
                });
            }
            serde_json::from_str::<T>(&text)
                .map_err(|e| LlmError::MalformedResponse(e.to_string()))
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| LlmError::Timeout(secs))?
    }
}

/// Extract `error.message` from an OpenAI error body, or fall back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

// ---------------------------------------------------------------------------
// Chat completions
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

/// Turn a decoded completion into an `LlmResponse`.
///
/// A reply with neither text nor tool calls is an error.
fn into_llm_response(resp: ChatCompletionResponse) -> Result<LlmResponse, LlmError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::MalformedResponse("no choices in completion".to_string()))?;

    let content = choice.message.content.filter(|c| !c.is_empty());
    let tool_calls = choice.message.tool_calls.unwrap_or_default();
    if content.is_none() && tool_calls.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(LlmResponse {
        content,
        tool_calls,
        finish_reason: choice.finish_reason,
    })
}

/// Chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    transport: Transport,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiClient {
    /// Build a client from the `[llm]` section and the API credential.
    pub fn from_config(config: &DocentConfig, api_key: String) -> Result<Self, LlmError> {
        let transport = Transport::new(
            &config.llm.base_url,
            api_key,
            Duration::from_secs(config.llm.request_timeout_secs),
        )?;
        Ok(Self {
            transport,
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse, LlmError> {
        debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "Requesting chat completion"
        );
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            tools,
            temperature: self.temperature,
        };
        let resp: ChatCompletionResponse =
            self.transport.post_json("chat/completions", &body).await?;
        into_llm_response(resp)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Embeddings
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Embedding client for the `[embedding]` model.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedding {
    transport: Transport,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbedding {
    /// Build a client from the `[embedding]` and `[llm]` sections.
    pub fn from_config(config: &DocentConfig, api_key: String) -> Result<Self, LlmError> {
        let transport = Transport::new(
            &config.llm.base_url,
            api_key,
            Duration::from_secs(config.llm.request_timeout_secs),
        )?;
        Ok(Self {
            transport,
            model: config.embedding.model.clone(),
            dimensions: config.embedding.dimensions,
        })
    }
}

impl EmbeddingService for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        if text.is_empty() {
            return Err(LlmError::EmptyInput);
        }
        let body = EmbeddingRequest {
            model: &self.model,
            input: text,
            dimensions: self.dimensions,
        };
        let resp: EmbeddingResponse = self.transport.post_json("embeddings", &body).await?;
        let embedding = resp
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| LlmError::MalformedResponse("no embedding in response".to_string()))?;

        if embedding.len() != self.dimensions {
            return Err(LlmError::MalformedResponse(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                embedding.len()
            )));
        }
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
