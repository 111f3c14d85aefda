//! Line-oriented interactive loop.
//!
//! Prompts, reads one line, and either stops or hands the line to the agent.
//! Only the exact line `exit` stops the loop; end of input stops it too.

use std::future::Future;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::agent::FunctionAgent;
use crate::context::AgentContext;
use crate::error::ReplError;
use crate::input::LineSource;
use crate::state::LoopState;

pub const PROMPT: &str = "\nEnter your question: ";
pub const EXIT_COMMAND: &str = "exit";

/// Interactive loop around one agent and one shared context.
#[derive(Debug)]
pub struct Repl {
    agent: FunctionAgent,
    context: AgentContext,
    state: LoopState,
}

impl Repl {
    pub fn new(agent: FunctionAgent, context: AgentContext) -> Self {
        Self {
            agent,
            context,
            state: LoopState::Idle,
        }
    }

    /// Run until `exit`, end of input, or an error. Ctrl-C interrupts.
    pub async fn run<R, W>(&mut self, reader: R, writer: W) -> Result<(), ReplError>
    where
        R: LineSource,
        W: AsyncWrite + Unpin,
    {
        let ctrl_c = async {
            // Without a signal handler there is nothing to wait for.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        self.run_until(reader, writer, ctrl_c).await
    }

    /// Like [`Repl::run`], with `interrupt` in place of Ctrl-C.
    ///
    /// When `interrupt` completes while waiting for input or while the agent
    /// is working, the turn is abandoned and `ReplError::Interrupted` returned.
    pub async fn run_until<R, W, I>(
        &mut self,
        mut reader: R,
        mut writer: W,
        interrupt: I,
    ) -> Result<(), ReplError>
    where
        R: LineSource,
        W: AsyncWrite + Unpin,
        I: Future<Output = ()>,
    {
        tokio::pin!(interrupt);

        loop {
            self.transition(LoopState::AwaitingInput)?;
            writer.write_all(PROMPT.as_bytes()).await?;
            writer.flush().await?;

            let next = tokio::select! {
                next = reader.next_line() => next?,
                _ = &mut interrupt => return Err(ReplError::Interrupted),
            };
            let Some(line) = next else {
                info!("End of input, stopping");
                self.transition(LoopState::Stopped)?;
                return Ok(());
            };

            let input = strip_line_terminator(&line);
            if input == EXIT_COMMAND {
                info!("Exit requested");
                self.transition(LoopState::Stopped)?;
                return Ok(());
            }

            self.transition(LoopState::Dispatching)?;
            debug!(chars = input.len(), "Dispatching input to agent");
            let response = tokio::select! {
                result = self.agent.run(input, &mut self.context) => result?,
                _ = &mut interrupt => return Err(ReplError::Interrupted),
            };

            self.transition(LoopState::Responding)?;
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            self.transition(LoopState::Idle)?;
        }
    }

    fn transition(&mut self, to: LoopState) -> Result<(), ReplError> {
        if !self.state.can_transition_to(&to) {
            return Err(ReplError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn context(&self) -> &AgentContext {
        &self.context
    }

    pub fn agent(&self) -> &FunctionAgent {
        &self.agent
    }
}

/// Remove the trailing `\n` or `\r\n`, nothing else.
fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
