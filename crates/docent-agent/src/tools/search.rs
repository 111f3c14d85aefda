//! Document search tool backed by the context chat engine.

use std::sync::Arc;

use async_trait::async_trait;
use docent_chat::ContextChatEngine;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::ToolError;
use crate::tool::Tool;

pub const SEARCH_TOOL_NAME: &str = "search_documents";

/// Answers natural language questions from the loaded documents.
///
/// The engine keeps its own conversation memory, so follow-up searches see
/// earlier searches.
pub struct SearchDocumentsTool {
    engine: Arc<Mutex<ContextChatEngine>>,
    description: String,
}

impl SearchDocumentsTool {
    pub fn new(engine: Arc<Mutex<ContextChatEngine>>, description: impl Into<String>) -> Self {
        Self {
            engine,
            description: description.into(),
        }
    }
}

#[async_trait]
impl Tool for SearchDocumentsTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Natural language question to answer from the documents"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<String, ToolError> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("missing string argument 'query'".to_string()))?;

        debug!(query = %query, "Searching documents");
        let mut engine = self.engine.lock().await;
        Ok(engine.answer(query).await?)
    }
}

impl std::fmt::Debug for SearchDocumentsTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDocumentsTool")
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_core::config::ChatConfig;
    use docent_index::{Retriever, TextNode, VectorIndex};
    use docent_llm::{LlmError, LlmResponse, MockEmbedding, ScriptedLlm};

    fn tool(llm: Arc<ScriptedLlm>) -> SearchDocumentsTool {
        let embedder = MockEmbedding::new(8);
        let mut index = VectorIndex::new("idx", 8);
        let text = "Members may book up to four players per slot.";
        index.insert(TextNode::new("n1", text), embedder.vector_for(text));
        let retriever = Retriever::new(Arc::new(index), Arc::new(embedder), 2);
        let engine = ContextChatEngine::new(retriever, llm, &ChatConfig::default());
        SearchDocumentsTool::new(Arc::new(Mutex::new(engine)), "Search the manual.")
    }

    #[tokio::test]
    async fn test_search_returns_engine_answer() {
        let llm = Arc::new(ScriptedLlm::replying(vec![LlmResponse::text("Four players.")]));
        let tool = tool(llm.clone());

        let out = tool
            .invoke(json!({"query": "How many players per slot?"}))
            .await
            .unwrap();
        assert_eq!(out, "Four players.");
        assert!(llm.requests()[0].messages[0]
            .text_content()
            .contains("four players per slot"));
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let tool = tool(Arc::new(ScriptedLlm::default()));
        let err = tool.invoke(json!({"q": "x"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_search_engine_failure() {
        let tool = tool(Arc::new(ScriptedLlm::new(vec![Err(LlmError::Http(
            "connection refused".to_string(),
        ))])));
        let err = tool.invoke(json!({"query": "anything"})).await.unwrap_err();
        assert!(matches!(err, ToolError::Search(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_configured_description() {
        let tool = tool(Arc::new(ScriptedLlm::default()));
        assert_eq!(tool.name(), "search_documents");
        assert_eq!(tool.description(), "Search the manual.");
    }
}
