use async_trait::async_trait;

use crate::error::ModelError;
use crate::ToolCall;

use super::message::ChatMessage;
use super::tool::Tool;

/// One step of the model's output: optional text plus any tool calls it
/// requested. Both accessors aggregate across all returned candidates.
pub trait ChatResponse: std::fmt::Debug + std::fmt::Display + Send + Sync {
    fn text(&self) -> Option<String>;
    fn tool_calls(&self) -> Option<Vec<ToolCall>>;
}

/// Trait for providers that support chat-style interactions.
#[async_trait]
pub trait ChatProvider: Sync + Send {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, ModelError> {
        self.chat_with_tools(messages, None).await
    }

    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, ModelError>;
}
