use serde_json::Value;

use codefence::chat::Tool;

use super::builtin::builtin_tools;
use super::context::ToolContext;
use super::definition::ToolDefinition;
use super::error::ToolError;

/// Maps tool names to implementations and dispatches calls.
///
/// The workspace root reaches implementations only through the
/// [`ToolContext`] handed to `execute`; a call can never supply its own.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: builtin_tools(),
        }
    }

    /// Get the list of tool names
    #[allow(dead_code)]
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    /// Check if a tool exists
    #[allow(dead_code)]
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }

    /// Declarations advertised to the model.
    pub fn declarations(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDefinition::declaration).collect()
    }

    pub fn execute(
        &self,
        name: &str,
        args_json: &str,
        context: &ToolContext,
    ) -> Result<String, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name == name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        let args = parse_args(args_json)?;
        (tool.executor)(context, args)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_args(raw: &str) -> Result<Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    let value: Value =
        serde_json::from_str(raw).map_err(|err| ToolError::InvalidArgs(err.to_string()))?;
    match value {
        // a call with no arguments arrives as JSON null
        Value::Null => Ok(Value::Object(serde_json::Map::new())),
        other => Ok(other),
    }
}
