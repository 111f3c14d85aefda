//! Assemble the assistant from configuration.
//!
//! Order matters: the index is loaded first so a missing or incompatible
//! storage directory fails before credentials are checked, any tool exists,
//! or any input is read.

use std::path::Path;
use std::sync::Arc;

use docent_chat::ContextChatEngine;
use docent_core::config::DocentConfig;
use docent_index::{load_index_from_storage, LoadError, Retriever, VectorIndex};
use docent_llm::{DynEmbeddingService, LlmClient};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::agent::FunctionAgent;
use crate::context::AgentContext;
use crate::error::AgentError;
use crate::repl::Repl;
use crate::tool::ToolRegistry;
use crate::tools::{MultiplyTool, SearchDocumentsTool};

/// Load the persisted index named by the configuration.
pub fn load_index(config: &DocentConfig) -> Result<VectorIndex, LoadError> {
    load_index_from_storage(
        Path::new(&config.index.storage_dir),
        config.index.index_id.as_deref(),
        config.embedding.dimensions,
    )
}

/// Build the agent over a loaded index with its `multiply` and
/// `search_documents` tools, ready to run interactively.
pub fn build_assistant(
    config: &DocentConfig,
    index: VectorIndex,
    llm: Arc<dyn LlmClient>,
    embedder: Arc<dyn DynEmbeddingService>,
) -> Result<Repl, AgentError> {
    if embedder.dimensions() != config.embedding.dimensions {
        warn!(
            embedder = embedder.dimensions(),
            configured = config.embedding.dimensions,
            "Embedding service dimension differs from configuration"
        );
    }

    let retriever = Retriever::new(
        Arc::new(index),
        embedder,
        config.index.similarity_top_k,
    );
    let engine = ContextChatEngine::new(retriever, Arc::clone(&llm), &config.chat);

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(MultiplyTool))?;
    tools.register(Arc::new(SearchDocumentsTool::new(
        Arc::new(Mutex::new(engine)),
        config.agent.search_tool_description.clone(),
    )))?;

    let model = llm.model().to_string();
    let agent = FunctionAgent::new(llm, tools, &config.agent)?;
    let context = AgentContext::new(config.agent.memory_token_limit);
    info!(
        model = %model,
        tools = ?agent.tools().names(),
        context = %context.id,
        "Assistant ready"
    );

    Ok(Repl::new(agent, context))
}
