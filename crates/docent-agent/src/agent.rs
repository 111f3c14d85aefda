//! Function-calling agent loop.
//!
//! Each iteration sends the system prompt, the context window and the tool
//! definitions to the LLM. Tool calls in the reply are executed in order and
//! their outputs appended as tool messages; a plain text reply ends the run.
//! Tool failures are returned to the model as `Error: ...` output so it can
//! recover, while LLM failures end the run.

use std::sync::Arc;

use docent_core::config::AgentConfig;
use docent_core::types::{ChatMessage, ToolCall};
use docent_llm::{LlmClient, LlmError};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::context::AgentContext;
use crate::error::{AgentError, ToolError};
use crate::tool::ToolRegistry;

/// Agent that answers by calling tools through the LLM.
pub struct FunctionAgent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    system_prompt: String,
    max_iterations: usize,
}

impl FunctionAgent {
    /// Build an agent. The registry must hold at least one tool.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        config: &AgentConfig,
    ) -> Result<Self, AgentError> {
        if tools.is_empty() {
            return Err(AgentError::NoTools);
        }
        Ok(Self {
            llm,
            tools,
            system_prompt: config.system_prompt.clone(),
            max_iterations: config.max_iterations,
        })
    }

    /// Answer `input`, recording the whole exchange in `ctx`.
    pub async fn run(&self, input: &str, ctx: &mut AgentContext) -> Result<String, AgentError> {
        ctx.push(ChatMessage::user(input));
        let definitions = self.tools.definitions();
        let system = ChatMessage::system(self.system_prompt.clone());
        let reserved = system.approx_tokens();

        for iteration in 0..self.max_iterations {
            debug!(iteration = iteration + 1, context = %ctx.id, "Agent iteration");

            let mut messages = Vec::with_capacity(ctx.history().len() + 1);
            messages.push(system.clone());
            messages.extend_from_slice(ctx.window(reserved));

            let response = self.llm.chat(&messages, &definitions).await?;

            if response.has_tool_calls() {
                ctx.push(ChatMessage::assistant_tool_calls(
                    response.content.clone(),
                    response.tool_calls.clone(),
                ));
                for call in &response.tool_calls {
                    let output = match self.execute(call).await {
                        Ok(output) => output,
                        Err(e) => {
                            warn!(tool = %call.function.name, error = %e, "Tool call failed");
                            format!("Error: {}", e)
                        }
                    };
                    ctx.push(ChatMessage::tool_result(call.id.clone(), output));
                }
                continue;
            }

            let text = response.content.ok_or(LlmError::EmptyResponse)?;
            ctx.push(ChatMessage::assistant(text.clone()));
            return Ok(text);
        }

        Err(AgentError::MaxIterations(self.max_iterations))
    }

    async fn execute(&self, call: &ToolCall) -> Result<String, ToolError> {
        let args = parse_arguments(&call.function.arguments)?;
        info!(tool = %call.function.name, arguments = %call.function.arguments, "Calling tool");
        let output = self.tools.invoke(&call.function.name, args).await?;
        debug!(tool = %call.function.name, output = %output, "Tool returned");
        Ok(output)
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

/// Decode tool-call arguments. An empty string means no arguments.
fn parse_arguments(raw: &str) -> Result<Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw)
        .map_err(|e| ToolError::InvalidArguments(format!("arguments are not valid JSON: {}", e)))
}

impl std::fmt::Debug for FunctionAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionAgent")
            .field("model", &self.llm.model())
            .field("tools", &self.tools)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}
