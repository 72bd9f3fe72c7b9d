mod prompt;
mod runner;
mod tooling;

use clap::Parser;

use codefence::backends::google::Google;

use crate::args::CliArgs;
use crate::logging;
use crate::sandbox::WorkspaceRoot;
use crate::tools::{ToolContext, ToolRegistry};

use runner::{AgentRunner, MAX_ITERATIONS};

const API_KEY_ENV: &str = "GEMINI_API_KEY";

const SYSTEM_INSTRUCTION: &str = "\
You are a helpful AI coding agent working inside a fixed working directory.

When the user asks a question or makes a request, make a function call plan. \
You can perform the following operations:

- List files and directories
- Read file contents
- Write or overwrite files
- Run Python files with optional arguments

All paths you provide should be relative to the working directory. You do not \
need to specify the working directory in your function calls; it is injected \
automatically for security reasons.";

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logging::init_logging(args.verbose)?;

    let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
    anyhow::ensure!(
        !api_key.is_empty(),
        "missing {API_KEY_ENV} environment variable"
    );
    let prompt = prompt::resolve_prompt(&args)?;

    let root = WorkspaceRoot::new(std::env::current_dir()?)?;
    log::debug!("workspace root: {}", root.as_path().display());
    let registry = ToolRegistry::new();
    let context = ToolContext::new(root);
    let provider = Google::new(
        api_key,
        None,
        None,
        None,
        None,
        None,
        Some(SYSTEM_INSTRUCTION.to_string()),
    );

    println!("\nQuestion: {prompt}\n");

    let mut runner = AgentRunner::new(
        Box::new(provider),
        registry,
        context,
        MAX_ITERATIONS,
        args.verbose,
    );
    let answer = runner.run(prompt).await?;
    println!("{answer}");
    Ok(())
}
