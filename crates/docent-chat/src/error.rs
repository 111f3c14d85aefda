//! Error types for the chat engine.

use docent_index::RetrieveError;
use docent_llm::LlmError;

/// Errors from one `ContextChatEngine::answer` call.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrieveError),
    #[error("answer synthesis failed: {0}")]
    Synthesis(#[from] LlmError),
}
