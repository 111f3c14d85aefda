//! Docent Core crate - configuration, top-level error type, and the chat
//! message types shared across the workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::DocentConfig;
pub use error::{DocentError, Result};
pub use types::*;
