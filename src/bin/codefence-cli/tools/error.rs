//! Tool execution error types.

use crate::sandbox::SandboxError;

/// Failure modes of a tool execution.
///
/// These never cross the dispatch boundary as errors: the tool runner
/// renders them into the result string fed back to the model.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ToolError {
    /// Invalid arguments provided to the tool.
    #[error("invalid tool arguments: {0}")]
    InvalidArgs(String),

    /// Tool execution failed with a message to show the model.
    #[error("tool execution failed: {0}")]
    Execution(String),

    /// Tool not found in registry.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Tool execution was denied by the sandbox.
    #[error("tool denied: {0}")]
    Denied(String),

    /// Script execution exceeded the wall-clock bound.
    #[error("execution timed out after {0} seconds")]
    Timeout(u64),
}

impl From<SandboxError> for ToolError {
    fn from(err: SandboxError) -> Self {
        ToolError::Denied(err.to_string())
    }
}
