use codefence::{FunctionCall, ToolCall};

use crate::tools::{ToolContext, ToolRegistry};

/// Executes the tool calls of one turn and shapes their results.
pub(super) struct ToolRunner {
    registry: ToolRegistry,
    context: ToolContext,
    verbose: bool,
}

impl ToolRunner {
    pub(super) fn new(registry: ToolRegistry, context: ToolContext, verbose: bool) -> Self {
        Self {
            registry,
            context,
            verbose,
        }
    }

    /// Execute calls strictly in the order the model returned them.
    ///
    /// Tool effects touch the filesystem, so calls within a turn are never
    /// run concurrently.
    pub(super) fn execute(&self, calls: &[ToolCall]) -> anyhow::Result<Vec<ToolCall>> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute_call(call)?);
        }
        Ok(results)
    }

    fn execute_call(&self, call: &ToolCall) -> anyhow::Result<ToolCall> {
        let output = self.run_tool(call);
        anyhow::ensure!(
            !output.is_empty(),
            "tool call {} produced no result content",
            call.function.name
        );
        Ok(tool_result_call(call, output))
    }

    fn run_tool(&self, call: &ToolCall) -> String {
        match self
            .registry
            .execute(&call.function.name, &call.function.arguments, &self.context)
        {
            Ok(output) => output,
            Err(err) => format!("Tool error: {err}"),
        }
    }

    pub(super) fn print_calls(&self, calls: &[ToolCall]) {
        if !self.verbose {
            return;
        }
        for call in calls {
            eprintln!("[tool] {} {}", call.function.name, call.function.arguments);
        }
    }

    pub(super) fn print_results(&self, results: &[ToolCall]) {
        if !self.verbose {
            return;
        }
        for result in results {
            eprintln!(
                "[tool result] {} {}",
                result.function.name, result.function.arguments
            );
        }
    }
}

/// Echo the call's identity with the output in place of the arguments.
fn tool_result_call(call: &ToolCall, output: String) -> ToolCall {
    ToolCall {
        id: call.id.clone(),
        call_type: call.call_type.clone(),
        function: FunctionCall {
            name: call.function.name.clone(),
            arguments: output,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::WorkspaceRoot;
    use tempfile::TempDir;

    fn runner() -> (TempDir, ToolRunner) {
        let dir = TempDir::new().expect("tempdir");
        let root = WorkspaceRoot::new(dir.path()).expect("workspace root");
        let runner = ToolRunner::new(ToolRegistry::new(), ToolContext::new(root), false);
        (dir, runner)
    }

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: format!("{name}-0"),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    #[test]
    fn results_echo_the_call_identity() {
        let (dir, runner) = runner();
        std::fs::write(dir.path().join("a.txt"), "x").expect("fixture");

        let results = runner
            .execute(&[call("ls", "{}")])
            .expect("execution succeeds");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "ls-0");
        assert_eq!(results[0].function.name, "ls");
        assert!(results[0].function.arguments.contains("a.txt"));
    }

    #[test]
    fn tool_failures_become_result_strings_not_errors() {
        let (_dir, runner) = runner();

        let results = runner
            .execute(&[call("teleport", "{}")])
            .expect("dispatch itself must not fail");
        assert_eq!(
            results[0].function.arguments,
            "Tool error: tool not found: teleport"
        );
    }

    #[test]
    fn sandbox_denials_keep_the_guard_message() {
        let (_dir, runner) = runner();

        let results = runner
            .execute(&[call("file_read", r#"{"file_path": "../secrets"}"#)])
            .expect("dispatch itself must not fail");
        let output = &results[0].function.arguments;
        assert!(output.starts_with("Tool error: tool denied:"));
        assert!(output.contains("outside the permitted working directory"));
    }

    #[test]
    fn calls_in_one_turn_execute_in_returned_order() {
        let (dir, runner) = runner();

        let results = runner
            .execute(&[
                call(
                    "file_write",
                    r#"{"file_path": "notes.txt", "content": "ordered"}"#,
                ),
                call("file_read", r#"{"file_path": "notes.txt"}"#),
            ])
            .expect("execution succeeds");
        // the read sees the write that preceded it in the same turn
        assert_eq!(results[1].function.arguments, "ordered");
        assert!(dir.path().join("notes.txt").exists());
    }
}
