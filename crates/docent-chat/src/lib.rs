//! Docent Chat crate - retrieval-augmented conversation over the loaded index.
//!
//! `ContextChatEngine` retrieves the best matching nodes for each message,
//! injects them into the system message, and answers with the LLM while
//! keeping a token-bounded conversation memory.

pub mod engine;
pub mod error;
pub mod memory;
pub mod prompt;

pub use engine::ContextChatEngine;
pub use error::ChatError;
pub use memory::ChatMemory;
