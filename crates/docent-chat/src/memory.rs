//! Token-bounded conversation memory.
//!
//! Every message is kept; `window` returns the newest suffix that fits the
//! token budget. A window always starts at a user message so it never opens
//! with an orphaned assistant reply or tool result.

use docent_core::types::{ChatMessage, Role};

/// Ordered conversation history with a token budget for what gets sent.
#[derive(Debug, Clone)]
pub struct ChatMemory {
    messages: Vec<ChatMessage>,
    token_limit: usize,
}

impl ChatMemory {
    pub fn new(token_limit: usize) -> Self {
        Self {
            messages: Vec::new(),
            token_limit,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Every message recorded since the last reset.
    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Newest messages fitting in the budget after `reserved` tokens are
    /// set aside (for the system message).
    ///
    /// The whole turn starting at the most recent user message is returned
    /// even when it alone exceeds the budget.
    pub fn window(&self, reserved: usize) -> &[ChatMessage] {
        let budget = self.token_limit.saturating_sub(reserved);
        let mut start = 0;
        let mut used: usize = self.messages.iter().map(ChatMessage::approx_tokens).sum();

        while used > budget {
            let next_user = self.messages[start + 1..]
                .iter()
                .position(|m| m.role == Role::User)
                .map(|p| start + 1 + p);
            let Some(next) = next_user else {
                break;
            };
            used -= self.messages[start..next]
                .iter()
                .map(ChatMessage::approx_tokens)
                .sum::<usize>();
            start = next;
        }

        // Never open on a non-user message.
        while start < self.messages.len() && self.messages[start].role != Role::User {
            start += 1;
        }

        &self.messages[start..]
    }

    pub fn token_limit(&self) -> usize {
        self.token_limit
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_core::types::ToolCall;
    use serde_json::json;

    fn turn(memory: &mut ChatMemory, question: &str, answer: &str) {
        memory.push(ChatMessage::user(question));
        memory.push(ChatMessage::assistant(answer));
    }

    #[test]
    fn test_window_fits_everything_under_budget() {
        let mut memory = ChatMemory::new(3000);
        turn(&mut memory, "hi", "hello");
        turn(&mut memory, "how are you", "fine");
        assert_eq!(memory.window(0).len(), 4);
        assert_eq!(memory.len(), 4);
    }

    #[test]
    fn test_window_drops_oldest_turns() {
        let long = "x".repeat(400); // 100 tokens + 4 overhead
        let mut memory = ChatMemory::new(200);
        turn(&mut memory, &long, "a1");
        turn(&mut memory, &long, "a2");
        turn(&mut memory, "latest", "a3");

        let window = memory.window(0);
        assert_eq!(window[0].role, Role::User);
        assert_eq!(window.last().unwrap().text_content(), "a3");
        let total: usize = window.iter().map(ChatMessage::approx_tokens).sum();
        assert!(total <= 200);
        assert_eq!(window.len(), 4);
        // Full history is retained.
        assert_eq!(memory.all().len(), 6);
    }

    #[test]
    fn test_window_respects_reserved_tokens() {
        let mut memory = ChatMemory::new(100);
        turn(&mut memory, &"y".repeat(120), "first");
        turn(&mut memory, "second question", "second");

        assert_eq!(memory.window(0).len(), 4);
        assert_eq!(memory.window(60).len(), 2);
    }

    #[test]
    fn test_window_keeps_oversized_latest_turn() {
        let mut memory = ChatMemory::new(10);
        memory.push(ChatMessage::user("z".repeat(1000)));
        let window = memory.window(0);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_window_never_splits_tool_exchange() {
        let mut memory = ChatMemory::new(60);
        memory.push(ChatMessage::user("What is 12 times 7?"));
        memory.push(ChatMessage::assistant_tool_calls(
            None,
            vec![ToolCall::new("c1", "multiply", json!({"a": 12, "b": 7}))],
        ));
        memory.push(ChatMessage::tool_result("c1", "84"));
        memory.push(ChatMessage::assistant("12 times 7 is 84."));
        memory.push(ChatMessage::user(&"q".repeat(120)));

        let window = memory.window(0);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].role, Role::User);
    }

    #[test]
    fn test_window_skips_leading_non_user_messages() {
        let mut memory = ChatMemory::new(1000);
        memory.push(ChatMessage::assistant("stray"));
        memory.push(ChatMessage::user("question"));
        let window = memory.window(0);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].text_content(), "question");
    }

    #[test]
    fn test_clear() {
        let mut memory = ChatMemory::new(100);
        turn(&mut memory, "a", "b");
        memory.clear();
        assert!(memory.is_empty());
        assert!(memory.window(0).is_empty());
    }
}
