//! Context chat engine.
//!
//! Each message goes through the same steps:
//!
//! 1. Retrieve the top matching nodes for the message.
//! 2. Build a system message holding the retrieved context.
//! 3. Record the user turn.
//! 4. Ask the LLM with the system message and the memory window.
//! 5. Record and return the assistant reply.
//!
//! A failed synthesis leaves the user turn in memory.

use std::sync::Arc;

use docent_core::config::ChatConfig;
use docent_core::types::ChatMessage;
use docent_index::Retriever;
use docent_llm::{LlmClient, LlmError};
use tracing::{debug, info};

use crate::error::ChatError;
use crate::memory::ChatMemory;
use crate::prompt::context_system_message;

/// Conversational question answering over a document index.
pub struct ContextChatEngine {
    retriever: Retriever,
    llm: Arc<dyn LlmClient>,
    memory: ChatMemory,
    system_prompt: Option<String>,
    verbose: bool,
}

impl ContextChatEngine {
    pub fn new(retriever: Retriever, llm: Arc<dyn LlmClient>, config: &ChatConfig) -> Self {
        Self {
            retriever,
            llm,
            memory: ChatMemory::new(config.memory_token_limit),
            system_prompt: config.system_prompt.clone(),
            verbose: config.verbose,
        }
    }

    /// Answer `query` using retrieved context and the conversation so far.
    pub async fn answer(&mut self, query: &str) -> Result<String, ChatError> {
        let nodes = self.retriever.retrieve(query).await?;

        if self.verbose {
            for hit in &nodes {
                info!(node_id = %hit.node.id, score = hit.score, "Retrieved context node");
            }
        }

        let system = ChatMessage::system(context_system_message(
            self.system_prompt.as_deref(),
            &nodes,
        ));
        self.memory.push(ChatMessage::user(query));

        let mut messages = Vec::with_capacity(self.memory.len() + 1);
        let reserved = system.approx_tokens();
        messages.push(system);
        messages.extend_from_slice(self.memory.window(reserved));

        debug!(
            model = %self.llm.model(),
            messages = messages.len(),
            context_nodes = nodes.len(),
            "Synthesizing answer"
        );
        let response = self.llm.chat(&messages, &[]).await?;
        let text = response.content.ok_or(LlmError::EmptyResponse)?;

        self.memory.push(ChatMessage::assistant(text.clone()));
        Ok(text)
    }

    /// Forget the conversation.
    pub fn reset(&mut self) {
        self.memory.clear();
    }

    /// Messages recorded since the last reset.
    pub fn history(&self) -> &[ChatMessage] {
        self.memory.all()
    }
}

impl std::fmt::Debug for ContextChatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextChatEngine")
            .field("retriever", &self.retriever)
            .field("model", &self.llm.model())
            .field("history", &self.memory.len())
            .field("verbose", &self.verbose)
            .finish()
    }
}
