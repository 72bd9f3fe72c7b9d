//! Python script execution tool.

use std::path::Path;
use std::process::{Output, Stdio};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;
use tokio::time;

use crate::tools::context::ToolContext;
use crate::tools::definition::{ToolDefinition, ToolParam};
use crate::tools::error::ToolError;

const PYTHON_BIN: &str = "python3";
const PYTHON_EXTENSION: &str = "py";

#[derive(Debug, Deserialize)]
struct RunPythonArgs {
    file_path: String,
    #[serde(default)]
    args: Vec<String>,
}

/// Create the run_python tool definition.
#[must_use]
pub fn run_python_tool() -> ToolDefinition {
    ToolDefinition {
        name: "run_python",
        description: "Run a Python file inside the working directory with optional \
                      arguments, capturing stdout, stderr and the exit code.",
        params: vec![
            ToolParam::simple(
                "file_path",
                "Python file to run, relative to the working directory.",
                "string",
            ),
            ToolParam::array("args", "Arguments to pass to the Python file.", "string"),
        ],
        required: vec!["file_path"],
        executor: Arc::new(execute_run_python),
    }
}

fn execute_run_python(ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
    let run_args: RunPythonArgs =
        serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))?;

    let target = ctx.root.resolve(&run_args.file_path)?;
    if !target.is_file() {
        return Err(ToolError::Execution(format!(
            "\"{}\" does not exist or is not a regular file",
            run_args.file_path
        )));
    }
    if target.extension().and_then(|ext| ext.to_str()) != Some(PYTHON_EXTENSION) {
        return Err(ToolError::Execution(format!(
            "\"{}\" is not a Python file",
            run_args.file_path
        )));
    }

    // Registry executors are synchronous; bridge onto the runtime the same
    // way as any blocking tool work.
    let output = tokio::task::block_in_place(|| {
        tokio::runtime::Handle::current().block_on(run_child(ctx, &target, &run_args.args))
    })?;
    Ok(compose_output(&output))
}

async fn run_child(
    ctx: &ToolContext,
    target: &Path,
    extra_args: &[String],
) -> Result<Output, ToolError> {
    let mut command = Command::new(PYTHON_BIN);
    command
        .arg(target)
        // arguments are a literal argv, never re-interpreted by a shell
        .args(extra_args)
        .current_dir(ctx.root.as_path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command
        .spawn()
        .map_err(|err| ToolError::Execution(format!("failed to spawn {PYTHON_BIN}: {err}")))?;

    match time::timeout(ctx.exec_timeout, child.wait_with_output()).await {
        Ok(result) => {
            result.map_err(|err| ToolError::Execution(format!("failed to collect output: {err}")))
        }
        // the dropped child is killed via kill_on_drop
        Err(_) => Err(ToolError::Timeout(ctx.exec_timeout.as_secs())),
    }
}

fn compose_output(output: &Output) -> String {
    let mut sections = Vec::new();
    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        sections.push(format!("Process exited with code {code}"));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stdout.is_empty() && stderr.is_empty() {
        sections.push("No output produced".to_string());
    } else {
        if !stdout.is_empty() {
            sections.push(format!("STDOUT:\n{stdout}"));
        }
        if !stderr.is_empty() {
            sections.push(format!("STDERR:\n{stderr}"));
        }
    }
    sections.join("\n")
}
