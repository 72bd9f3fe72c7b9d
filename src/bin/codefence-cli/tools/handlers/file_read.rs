//! File read tool with a hard character cap.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::tools::context::ToolContext;
use crate::tools::definition::{ToolDefinition, ToolParam};
use crate::tools::error::ToolError;

#[derive(Debug, Deserialize)]
struct FileReadArgs {
    file_path: String,
}

/// Create the file_read tool definition.
#[must_use]
pub fn file_read_tool() -> ToolDefinition {
    ToolDefinition {
        name: "file_read",
        description: "Read the content of a text file relative to the working directory, \
                      truncated when it exceeds the character limit.",
        params: vec![ToolParam::simple(
            "file_path",
            "File to read, relative to the working directory.",
            "string",
        )],
        required: vec!["file_path"],
        executor: Arc::new(execute_file_read),
    }
}

fn execute_file_read(ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
    let read_args: FileReadArgs =
        serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))?;

    let target = ctx.root.resolve(&read_args.file_path)?;
    if target.is_dir() {
        return Err(ToolError::Execution(format!(
            "\"{}\" is a directory, not a file",
            read_args.file_path
        )));
    }
    if !target.is_file() {
        return Err(ToolError::Execution(format!(
            "\"{}\" does not exist or is not a regular file",
            read_args.file_path
        )));
    }

    let (content, truncated) = read_capped(&target, ctx.max_read_chars)?;
    if truncated {
        return Ok(format!(
            "{content}\n\n[...File \"{}\" truncated at {} characters]",
            read_args.file_path, ctx.max_read_chars
        ));
    }
    Ok(content)
}

/// Read at most `max_chars` characters, reporting whether content remains.
///
/// Only a bounded number of bytes leaves the file (worst-case UTF-8 width
/// plus one lookahead byte), so an oversized file is never pulled into
/// memory whole.
fn read_capped(path: &Path, max_chars: usize) -> Result<(String, bool), ToolError> {
    let byte_budget = max_chars.saturating_mul(4);
    let file =
        File::open(path).map_err(|err| ToolError::Execution(format!("cannot open file: {err}")))?;

    let mut buf = Vec::new();
    file.take(byte_budget as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(|err| ToolError::Execution(format!("cannot read file: {err}")))?;
    let clipped = buf.len() > byte_budget;
    if clipped {
        buf.truncate(byte_budget);
    }

    let text = match std::str::from_utf8(&buf) {
        Ok(text) => text,
        // a char split by the byte budget is our doing, not the file's
        Err(err) if clipped && err.error_len().is_none() => {
            std::str::from_utf8(&buf[..err.valid_up_to()]).unwrap_or("")
        }
        Err(_) => {
            return Err(ToolError::Execution(
                "cannot decode file as UTF-8 text".to_string(),
            ))
        }
    };

    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Ok((text[..cut].to_string(), true)),
        None => Ok((text.to_string(), clipped)),
    }
}
