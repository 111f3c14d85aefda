//! Interactive loop state machine.
//!
//! Valid transitions:
//! - Idle -> AwaitingInput (prompt written)
//! - AwaitingInput -> Dispatching (line read, handed to the agent)
//! - Dispatching -> Responding (agent answered)
//! - Responding -> Idle (answer written)
//! - AwaitingInput -> Stopped (exit command or end of input)

use std::fmt;

/// Where the interactive loop is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopState {
    /// Between turns.
    Idle,
    /// Prompt written, waiting for a line.
    AwaitingInput,
    /// The agent is working on the input.
    Dispatching,
    /// Writing the agent's answer.
    Responding,
    /// Loop finished. Terminal.
    Stopped,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopState::Idle => write!(f, "Idle"),
            LoopState::AwaitingInput => write!(f, "AwaitingInput"),
            LoopState::Dispatching => write!(f, "Dispatching"),
            LoopState::Responding => write!(f, "Responding"),
            LoopState::Stopped => write!(f, "Stopped"),
        }
    }
}

impl LoopState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &LoopState) -> bool {
        matches!(
            (self, target),
            (LoopState::Idle, LoopState::AwaitingInput)
                | (LoopState::AwaitingInput, LoopState::Dispatching)
                | (LoopState::Dispatching, LoopState::Responding)
                | (LoopState::Responding, LoopState::Idle)
                | (LoopState::AwaitingInput, LoopState::Stopped)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Stopped)
    }
}
