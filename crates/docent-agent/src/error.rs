//! Error types for tools, the agent, and the interactive loop.

use docent_chat::ChatError;
use docent_llm::LlmError;

use crate::state::LoopState;

/// Errors from a single tool invocation. Reported back to the model.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("document search failed: {0}")]
    Search(#[from] ChatError),
}

/// Errors from building or running the agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),
    #[error("no final answer after {0} iterations")]
    MaxIterations(usize),
    #[error("tool already registered: {0}")]
    DuplicateTool(String),
    #[error("agent has no tools")]
    NoTools,
}

/// Errors that end the interactive loop.
#[derive(Debug, thiserror::Error)]
pub enum ReplError {
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("interrupted")]
    Interrupted,
    #[error("invalid loop transition: {from} -> {to}")]
    InvalidTransition { from: LoopState, to: LoopState },
}

impl ReplError {
    /// Process exit status for this error. An interrupt exits the way an
    /// unhandled SIGINT would (128 + 2).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => 130,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::InvalidArguments("missing numeric argument 'b'".to_string());
        assert_eq!(
            err.to_string(),
            "invalid arguments: missing numeric argument 'b'"
        );
        assert_eq!(
            ToolError::UnknownTool("divide".to_string()).to_string(),
            "unknown tool: divide"
        );
    }

    #[test]
    fn test_agent_error_from_llm() {
        let err: AgentError = LlmError::Timeout(60).into();
        assert!(matches!(err, AgentError::Llm(LlmError::Timeout(60))));
        assert_eq!(
            AgentError::MaxIterations(20).to_string(),
            "no final answer after 20 iterations"
        );
    }

    #[test]
    fn test_repl_error_is_transparent_over_agent() {
        let err: ReplError = AgentError::NoTools.into();
        assert_eq!(err.to_string(), "agent has no tools");

        let err = ReplError::InvalidTransition {
            from: LoopState::Idle,
            to: LoopState::Responding,
        };
        assert_eq!(err.to_string(), "invalid loop transition: Idle -> Responding");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ReplError::Interrupted.exit_code(), 130);
        assert_eq!(ReplError::from(AgentError::MaxIterations(3)).exit_code(), 1);
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(ReplError::from(io).exit_code(), 1);
    }
}
