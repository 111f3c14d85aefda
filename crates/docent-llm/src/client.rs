//! Chat-completions client seam.

use async_trait::async_trait;
use docent_core::types::{ChatMessage, ToolCall, ToolDefinition};

use crate::error::LlmError;

/// One completion returned by the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmResponse {
    /// Assistant text, if any.
    pub content: Option<String>,
    /// Tool invocations requested by the model, in order.
    pub tool_calls: Vec<ToolCall>,
    /// Provider finish reason (`stop`, `tool_calls`, `length`, ...).
    pub finish_reason: Option<String>,
}

impl LlmResponse {
    /// Plain text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            finish_reason: Some("stop".to_string()),
        }
    }

    /// Reply requesting tool invocations.
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls,
            finish_reason: Some("tool_calls".to_string()),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A chat-completions backend.
///
/// Which tools to call is decided by the model behind this trait; callers
/// only advertise tool definitions and execute whatever comes back.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion over `messages`, advertising `tools` (may be empty).
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse, LlmError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
