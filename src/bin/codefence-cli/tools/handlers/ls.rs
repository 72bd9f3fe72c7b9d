//! Directory listing tool.

use std::fs;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::tools::context::ToolContext;
use crate::tools::definition::{ToolDefinition, ToolParam};
use crate::tools::error::ToolError;

#[derive(Debug, Deserialize)]
struct LsArgs {
    #[serde(default = "default_directory")]
    directory: String,
}

fn default_directory() -> String {
    ".".to_string()
}

/// Create the ls tool definition.
#[must_use]
pub fn ls_tool() -> ToolDefinition {
    ToolDefinition {
        name: "ls",
        description: "List the immediate entries of a directory relative to the working \
                      directory, with byte sizes and directory flags.",
        params: vec![ToolParam::simple(
            "directory",
            "Directory to list, relative to the working directory \
             (defaults to the working directory itself).",
            "string",
        )],
        required: vec![],
        executor: Arc::new(execute_ls),
    }
}

fn execute_ls(ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
    let ls_args: LsArgs =
        serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))?;

    let target = ctx.root.resolve(&ls_args.directory)?;
    if !target.is_dir() {
        return Err(ToolError::Execution(format!(
            "\"{}\" is not a directory",
            ls_args.directory
        )));
    }

    let reader = fs::read_dir(&target).map_err(|err| {
        ToolError::Execution(format!("cannot list \"{}\": {err}", ls_args.directory))
    })?;

    let mut lines = Vec::new();
    for entry in reader.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        // size is best-effort: an entry whose stat fails still shows up
        let size = entry.metadata().map(|meta| meta.len()).unwrap_or(0);
        let is_dir = entry
            .file_type()
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        lines.push(format!("- {name}: file_size={size} bytes, is_dir={is_dir}"));
    }
    lines.sort();

    if lines.is_empty() {
        return Ok(format!("The directory '{}' is empty.", ls_args.directory));
    }
    Ok(lines.join("\n"))
}
