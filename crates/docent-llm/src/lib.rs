//! External model services for Docent.
//!
//! Defines the `LlmClient` (chat completions with function calling) and
//! `EmbeddingService` seams, their OpenAI-compatible HTTP implementations,
//! and deterministic mocks used by tests across the workspace.

pub mod client;
pub mod embedding;
pub mod error;
pub mod mock;
pub mod openai;

pub use client::{LlmClient, LlmResponse};
pub use embedding::{DynEmbeddingService, EmbeddingService};
pub use error::LlmError;
pub use mock::{MockEmbedding, ScriptedLlm};
pub use openai::{OpenAiClient, OpenAiEmbedding};
