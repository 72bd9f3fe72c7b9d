mod message;
mod tool;
mod traits;

pub use message::{ChatMessage, ChatMessageBuilder, ChatRole, MessageType};
pub use tool::{FunctionTool, ParameterProperty, ParametersSchema, Tool};
pub use traits::{ChatProvider, ChatResponse};
