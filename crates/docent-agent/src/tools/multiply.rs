//! Arithmetic tool: multiply two numbers.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tool::Tool;

/// Multiplies two numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplyTool;

fn number_arg(args: &Value, key: &str) -> Result<f64, ToolError> {
    args.get(key).and_then(Value::as_f64).ok_or_else(|| {
        ToolError::InvalidArguments(format!("missing numeric argument '{}'", key))
    })
}

#[async_trait]
impl Tool for MultiplyTool {
    fn name(&self) -> &str {
        "multiply"
    }

    fn description(&self) -> &str {
        "Useful for multiplying two numbers."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": {"type": "number", "description": "First factor"},
                "b": {"type": "number", "description": "Second factor"}
            },
            "required": ["a", "b"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<String, ToolError> {
        let a = number_arg(&args, "a")?;
        let b = number_arg(&args, "b")?;
        Ok((a * b).to_string())
    }
}
