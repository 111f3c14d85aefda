//! Docent Agent crate - tool-calling agent and the interactive loop.
//!
//! The agent advertises a small set of tools to the LLM, executes whatever
//! calls come back, and feeds the results into the next round until the
//! model answers in plain text. `Repl` drives one agent over a line source
//! and a writer.

pub mod agent;
pub mod bootstrap;
pub mod context;
pub mod error;
pub mod input;
pub mod repl;
pub mod state;
pub mod tool;
pub mod tools;

pub use agent::FunctionAgent;
pub use bootstrap::{build_assistant, load_index};
pub use context::AgentContext;
pub use error::{AgentError, ReplError, ToolError};
pub use input::{LineSource, StdinLines};
pub use repl::Repl;
pub use state::LoopState;
pub use tool::{Tool, ToolRegistry};
