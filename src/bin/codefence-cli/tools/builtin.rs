use super::definition::ToolDefinition;
use super::handlers::{file_read_tool, file_write_tool, ls_tool, run_python_tool};

/// Create all built-in tools, in the order they are advertised.
pub fn builtin_tools() -> Vec<ToolDefinition> {
    vec![
        ls_tool(),
        file_read_tool(),
        file_write_tool(),
        run_python_tool(),
    ]
}
