//! Built-in tools.

mod multiply;
mod search;

pub use multiply::MultiplyTool;
pub use search::{SearchDocumentsTool, SEARCH_TOOL_NAME};
