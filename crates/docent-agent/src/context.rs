//! Agent conversation context.
//!
//! One context is created per process and shared by every turn of the
//! interactive loop, so later questions can refer to earlier answers.

use docent_chat::ChatMemory;
use docent_core::types::ChatMessage;
use uuid::Uuid;

/// Conversation state carried across agent runs.
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub id: Uuid,
    memory: ChatMemory,
}

impl AgentContext {
    pub fn new(memory_token_limit: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            memory: ChatMemory::new(memory_token_limit),
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.memory.push(message);
    }

    /// Newest messages within the token budget, after `reserved` tokens.
    pub fn window(&self, reserved: usize) -> &[ChatMessage] {
        self.memory.window(reserved)
    }

    /// Every message recorded in this context.
    pub fn history(&self) -> &[ChatMessage] {
        self.memory.all()
    }

    pub fn reset(&mut self) {
        self.memory.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_contexts_have_distinct_ids() {
        let a = AgentContext::new(100);
        let b = AgentContext::new(100);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_push_and_reset() {
        let mut ctx = AgentContext::new(1000);
        ctx.push(ChatMessage::user("hello"));
        ctx.push(ChatMessage::assistant("hi"));
        assert_eq!(ctx.history().len(), 2);
        assert_eq!(ctx.window(0).len(), 2);

        ctx.reset();
        assert!(ctx.history().is_empty());
    }
}
