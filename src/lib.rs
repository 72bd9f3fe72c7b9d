//! Model-collaborator layer for the codefence agent.
//!
//! The crate exposes the conversation data model ([`chat`]), the errors a
//! provider can produce ([`error`]), and the concrete backend talking to
//! Google's Gemini API ([`backends::google`]). The agent binary builds on
//! top of these: it owns the transcript, advertises its tool declarations
//! through [`chat::Tool`], and interprets each [`ToolCall`] the model
//! requests.

pub mod backends;
pub mod chat;
pub mod error;

use serde::{Deserialize, Serialize};

pub use chat::{ChatMessage, ChatProvider, ChatResponse, ChatRole, MessageType, Tool};
pub use error::ModelError;

/// A single function invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the tool to invoke.
    pub name: String,
    /// Arguments as a JSON-encoded object string.
    pub arguments: String,
}

/// A model-issued request to invoke one named capability.
///
/// The same shape carries results back: the dispatcher echoes `id` and
/// `function.name` and replaces `function.arguments` with the tool's
/// output string, so the model can correlate results to calls in a
/// multi-call turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier correlating this call with its result.
    pub id: String,
    /// The kind of call (currently always "function").
    #[serde(rename = "type")]
    pub call_type: String,
    /// The function being called.
    pub function: FunctionCall,
}
