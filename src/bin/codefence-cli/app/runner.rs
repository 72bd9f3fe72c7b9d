use codefence::chat::{ChatMessage, ChatProvider, Tool};

use crate::tools::{ToolContext, ToolRegistry};

use super::tooling::ToolRunner;

/// Ceiling on model-request/tool-dispatch cycles before a run is declared
/// exhausted.
pub const MAX_ITERATIONS: usize = 20;

/// Drives the conversation until the model produces a final answer.
///
/// Owns the transcript for the lifetime of one run; nothing else appends
/// to it.
pub struct AgentRunner {
    provider: Box<dyn ChatProvider>,
    tools: Vec<Tool>,
    tool_runner: ToolRunner,
    max_iterations: usize,
    verbose: bool,
}

/// What one model step decided.
enum TurnOutcome {
    /// The model answered in plain text; the run is over.
    Final(String),
    /// Tool calls were dispatched and results appended; go around again.
    Continue,
}

impl AgentRunner {
    pub fn new(
        provider: Box<dyn ChatProvider>,
        registry: ToolRegistry,
        context: ToolContext,
        max_iterations: usize,
        verbose: bool,
    ) -> Self {
        let tools = registry.declarations();
        Self {
            provider,
            tools,
            tool_runner: ToolRunner::new(registry, context, verbose),
            max_iterations,
            verbose,
        }
    }

    /// Run the loop to completion, returning the model's final answer.
    ///
    /// Fatal conditions (no candidates, an empty tool result, the
    /// iteration ceiling) surface as errors; tool-level failures do not —
    /// they ride back to the model inside result strings.
    pub async fn run(&mut self, prompt: String) -> anyhow::Result<String> {
        let mut messages = vec![ChatMessage::user().content(prompt).build()];
        for iteration in 1..=self.max_iterations {
            if self.verbose {
                eprintln!("\n--- Iteration {iteration} ---");
            }
            log::debug!("iteration {iteration}: requesting next step from the model");
            match self.step(&mut messages).await? {
                TurnOutcome::Final(answer) => return Ok(answer),
                TurnOutcome::Continue => {}
            }
        }
        anyhow::bail!(
            "agent failed to produce an answer within {} iterations",
            self.max_iterations
        )
    }

    async fn step(&mut self, messages: &mut Vec<ChatMessage>) -> anyhow::Result<TurnOutcome> {
        let response = self
            .provider
            .chat_with_tools(messages, Some(&self.tools))
            .await?;
        let text = response.text().unwrap_or_default();
        let tool_calls = response.tool_calls().unwrap_or_default();

        // the model's own reasoning stays in the transcript for the next round
        if !text.trim().is_empty() {
            messages.push(ChatMessage::assistant().content(text.clone()).build());
        }
        if tool_calls.is_empty() {
            return Ok(TurnOutcome::Final(text.trim().to_string()));
        }

        self.tool_runner.print_calls(&tool_calls);
        messages.push(ChatMessage::assistant().tool_use(tool_calls.clone()).build());
        let results = self.tool_runner.execute(&tool_calls)?;
        self.tool_runner.print_results(&results);
        messages.push(ChatMessage::assistant().tool_result(results).build());
        Ok(TurnOutcome::Continue)
    }
}
