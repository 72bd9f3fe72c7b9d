//! File write tool.

use std::fs;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::tools::context::ToolContext;
use crate::tools::definition::{ToolDefinition, ToolParam};
use crate::tools::error::ToolError;

#[derive(Debug, Deserialize)]
struct FileWriteArgs {
    file_path: String,
    content: String,
}

/// Create the file_write tool definition.
#[must_use]
pub fn file_write_tool() -> ToolDefinition {
    ToolDefinition {
        name: "file_write",
        description: "Write content to a file relative to the working directory, creating \
                      missing parent directories and overwriting any existing file.",
        params: vec![
            ToolParam::simple(
                "file_path",
                "File to write, relative to the working directory.",
                "string",
            ),
            ToolParam::simple("content", "Content to write to the file.", "string"),
        ],
        required: vec!["file_path", "content"],
        executor: Arc::new(execute_file_write),
    }
}

fn execute_file_write(ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
    let write_args: FileWriteArgs =
        serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))?;

    let target = ctx.root.resolve(&write_args.file_path)?;
    if target.is_dir() {
        return Err(ToolError::Execution(format!(
            "cannot write to \"{}\": it is a directory",
            write_args.file_path
        )));
    }

    let written = write_args.content.chars().count();
    if written > ctx.max_write_chars {
        return Err(ToolError::Execution(format!(
            "content too large ({written} characters, limit {})",
            ctx.max_write_chars
        )));
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            ToolError::Execution(format!(
                "failed to create parent directories for \"{}\": {err}",
                write_args.file_path
            ))
        })?;
    }
    fs::write(&target, &write_args.content).map_err(|err| {
        ToolError::Execution(format!(
            "failed to write \"{}\": {err}",
            write_args.file_path
        ))
    })?;

    Ok(format!(
        "Successfully wrote to \"{}\" ({written} characters written)",
        write_args.file_path
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::WorkspaceRoot;
    use crate::tools::handlers::file_read::file_read_tool;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn context() -> (TempDir, ToolContext) {
        let dir = TempDir::new().expect("tempdir");
        let root = WorkspaceRoot::new(dir.path()).expect("workspace root");
        (dir, ToolContext::new(root))
    }

    #[test]
    fn writes_and_reports_character_count() {
        let (dir, ctx) = context();
        let message = execute_file_write(
            &ctx,
            json!({"file_path": "out.txt", "content": "hello"}),
        )
        .expect("write succeeds");
        assert_eq!(
            message,
            "Successfully wrote to \"out.txt\" (5 characters written)"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("out.txt")).expect("read back"),
            "hello"
        );
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_dir, ctx) = context();
        let body = "def main():\n    print(\"héllo\")\n";
        execute_file_write(&ctx, json!({"file_path": "app.py", "content": body}))
            .expect("write succeeds");
        let read = (file_read_tool().executor)(&ctx, json!({"file_path": "app.py"}))
            .expect("read succeeds");
        assert_eq!(read, body);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let (dir, ctx) = context();
        execute_file_write(
            &ctx,
            json!({"file_path": "a/b/c.txt", "content": "nested"}),
        )
        .expect("write succeeds");
        assert_eq!(
            fs::read_to_string(dir.path().join("a/b/c.txt")).expect("read back"),
            "nested"
        );
    }

    #[test]
    fn repeated_writes_overwrite_wholesale() {
        let (dir, ctx) = context();
        execute_file_write(&ctx, json!({"file_path": "f.txt", "content": "first version"}))
            .expect("first write");
        execute_file_write(&ctx, json!({"file_path": "f.txt", "content": "second"}))
            .expect("second write");
        assert_eq!(
            fs::read_to_string(dir.path().join("f.txt")).expect("read back"),
            "second"
        );
    }

    #[test]
    fn writing_over_a_directory_fails() {
        let (dir, ctx) = context();
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        let err = execute_file_write(&ctx, json!({"file_path": "sub", "content": "x"}))
            .expect_err("directory target");
        assert!(matches!(err, ToolError::Execution(_)));
    }

    #[test]
    fn oversized_content_is_rejected() {
        let (dir, ctx) = context();
        let mut small_ctx = ctx;
        small_ctx.max_write_chars = 8;
        let err = execute_file_write(
            &small_ctx,
            json!({"file_path": "f.txt", "content": "nine chars"}),
        )
        .expect_err("over the cap");
        assert!(matches!(err, ToolError::Execution(_)));
        assert!(!dir.path().join("f.txt").exists());
    }

    #[test]
    fn writing_outside_the_root_is_denied() {
        let (_dir, ctx) = context();
        let err = execute_file_write(
            &ctx,
            json!({"file_path": "../escape.txt", "content": "x"}),
        )
        .expect_err("escape");
        assert!(matches!(err, ToolError::Denied(_)));
    }

    #[test]
    fn missing_content_argument_is_invalid_args() {
        let (_dir, ctx) = context();
        let err = execute_file_write(&ctx, json!({"file_path": "f.txt"}))
            .expect_err("missing content");
        assert!(matches!(err, ToolError::InvalidArgs(_)));
    }
}
