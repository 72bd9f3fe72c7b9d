//! Google Gemini API client implementation for chat and tool calling.
//!
//! This module provides integration with Google's Gemini models through the
//! `generateContent` endpoint of the Generative Language API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::chat::{ChatMessage, ChatProvider, ChatResponse, ChatRole, MessageType, Tool};
use crate::error::ModelError;
use crate::{FunctionCall, ToolCall};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for the Google client.
#[derive(Debug)]
pub struct GoogleConfig {
    /// API key for authentication with the Generative Language API.
    pub api_key: String,
    /// Base URL of the API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate in responses.
    pub max_tokens: Option<u32>,
    /// Sampling temperature for response randomness.
    pub temperature: Option<f32>,
    /// System instruction to guide model behavior.
    pub system: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Client for interacting with Google's Gemini API.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct Google {
    config: Arc<GoogleConfig>,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GoogleSystemInstruction<'a>>,
    contents: Vec<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GoogleToolGroup<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GoogleGenerationConfig>,
}

#[derive(Serialize)]
struct GoogleSystemInstruction<'a> {
    parts: Vec<GoogleTextPart<'a>>,
}

#[derive(Serialize)]
struct GoogleTextPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct GoogleContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GooglePart>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct GooglePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<GoogleFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<GoogleFunctionResponse>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct GoogleFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct GoogleFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleToolGroup<'a> {
    function_declarations: Vec<GoogleFunctionDeclaration<'a>>,
}

#[derive(Serialize)]
struct GoogleFunctionDeclaration<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Response from the `generateContent` endpoint.
#[derive(Deserialize, Debug)]
struct GoogleChatResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Deserialize, Debug)]
struct GoogleCandidate {
    content: Option<GoogleContent>,
}

impl std::fmt::Display for GoogleChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.text() {
            Some(text) => write!(f, "{text}"),
            None => write!(f, "No response content"),
        }
    }
}

impl GoogleChatResponse {
    fn parts(&self) -> impl Iterator<Item = &GooglePart> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
    }
}

impl ChatResponse for GoogleChatResponse {
    fn text(&self) -> Option<String> {
        let text: String = self
            .parts()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        let calls: Vec<ToolCall> = self
            .parts()
            .filter_map(|part| part.function_call.as_ref())
            .enumerate()
            .map(|(index, call)| ToolCall {
                // Gemini does not assign call ids; synthesize stable ones.
                id: format!("{}-{index}", call.name),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: call.name.clone(),
                    arguments: call.args.to_string(),
                },
            })
            .collect();
        if calls.is_empty() {
            None
        } else {
            Some(calls)
        }
    }
}

impl Google {
    /// Creates a new Google client with the specified configuration.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(sec));
        }
        Self::with_client(
            builder.build().expect("Failed to build reqwest Client"),
            api_key,
            base_url,
            model,
            max_tokens,
            temperature,
            timeout_seconds,
            system,
        )
    }

    /// Creates a new Google client with a custom HTTP client.
    #[allow(clippy::too_many_arguments)]
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
    ) -> Self {
        Self {
            config: Arc::new(GoogleConfig {
                api_key: api_key.into(),
                base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens,
                temperature,
                system,
                timeout_seconds,
            }),
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn system(&self) -> Option<&str> {
        self.config.system.as_deref()
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request<'a>(
        &'a self,
        messages: &[ChatMessage],
        tools: Option<&'a [Tool]>,
    ) -> GoogleChatRequest<'a> {
        let generation_config = if self.config.max_tokens.is_some()
            || self.config.temperature.is_some()
        {
            Some(GoogleGenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            })
        } else {
            None
        };

        GoogleChatRequest {
            system_instruction: self.config.system.as_deref().map(|text| {
                GoogleSystemInstruction {
                    parts: vec![GoogleTextPart { text }],
                }
            }),
            contents: convert_messages(messages),
            tools: tools.filter(|t| !t.is_empty()).map(|tools| {
                vec![GoogleToolGroup {
                    function_declarations: tools
                        .iter()
                        .map(|tool| GoogleFunctionDeclaration {
                            name: &tool.function.name,
                            description: &tool.function.description,
                            parameters: &tool.function.parameters,
                        })
                        .collect(),
                }]
            }),
            generation_config,
        }
    }
}

/// Convert transcript messages into the Gemini wire format.
///
/// Tool results are re-labelled as user-role `functionResponse` parts, per
/// the protocol the API expects.
fn convert_messages(messages: &[ChatMessage]) -> Vec<GoogleContent> {
    messages
        .iter()
        .map(|message| match &message.message_type {
            MessageType::ToolResult(results) => GoogleContent {
                role: Some("user".to_string()),
                parts: results
                    .iter()
                    .map(|result| GooglePart {
                        function_response: Some(GoogleFunctionResponse {
                            name: result.function.name.clone(),
                            response: json!({ "result": result.function.arguments }),
                        }),
                        ..GooglePart::default()
                    })
                    .collect(),
            },
            MessageType::ToolUse(calls) => GoogleContent {
                role: Some(wire_role(&message.role).to_string()),
                parts: calls
                    .iter()
                    .map(|call| GooglePart {
                        function_call: Some(GoogleFunctionCall {
                            name: call.function.name.clone(),
                            args: serde_json::from_str(&call.function.arguments)
                                .unwrap_or_else(|_| json!({})),
                        }),
                        ..GooglePart::default()
                    })
                    .collect(),
            },
            MessageType::Text => GoogleContent {
                role: Some(wire_role(&message.role).to_string()),
                parts: vec![GooglePart {
                    text: Some(message.content.clone()),
                    ..GooglePart::default()
                }],
            },
        })
        .collect()
}

fn wire_role(role: &ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "model",
    }
}

#[async_trait]
impl ChatProvider for Google {
    /// Sends a chat request to the Gemini API, advertising the given tools.
    ///
    /// A response with zero candidates is an error: the control loop treats
    /// it as a broken contract, not an empty turn.
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, ModelError> {
        if self.config.api_key.is_empty() {
            return Err(ModelError::Auth("Missing Google API key".to_string()));
        }

        let body = self.build_request(messages, tools);

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(payload) = serde_json::to_string(&body) {
                log::trace!("Google request payload: {payload}");
            }
        }

        let resp = self
            .client
            .post(self.chat_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        log::debug!("Google HTTP status: {}", resp.status());

        let resp = resp.error_for_status()?;
        let json_resp: GoogleChatResponse = resp.json().await?;

        if json_resp.candidates.is_empty() {
            return Err(ModelError::Provider(
                "model returned no candidates".to_string(),
            ));
        }

        Ok(Box::new(json_resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_call(name: &str, arguments: &str) -> ToolCall {
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
    fn request_maps_roles_and_tool_results() {
        let google = Google::new("key", None, None, None, None, None, Some("be nice".into()));
        let messages = vec![
            ChatMessage::user().content("list the files").build(),
            ChatMessage::assistant()
                .tool_use(vec![tool_call("ls", r#"{"directory":"."}"#)])
                .build(),
            ChatMessage::assistant()
                .tool_result(vec![tool_call("ls", "- a.py: file_size=1 bytes, is_dir=false")])
                .build(),
        ];

        let request = google.build_request(&messages, None);
        let value = serde_json::to_value(&request).expect("request serializes");

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be nice");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "list the files");
        assert_eq!(value["contents"][1]["role"], "model");
        assert_eq!(
            value["contents"][1]["parts"][0]["functionCall"]["args"]["directory"],
            "."
        );
        // tool results go back as user-role functionResponse parts
        assert_eq!(value["contents"][2]["role"], "user");
        assert_eq!(
            value["contents"][2]["parts"][0]["functionResponse"]["name"],
            "ls"
        );
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn request_advertises_function_declarations() {
        let google = Google::new("key", None, None, None, None, None, None);
        let tools = vec![Tool {
            tool_type: "function".to_string(),
            function: crate::chat::FunctionTool {
                name: "file_read".to_string(),
                description: "Read a file".to_string(),
                parameters: json!({"type": "object", "properties": {}}),
            },
        }];
        let messages = vec![ChatMessage::user().content("hi").build()];

        let request = google.build_request(&messages, Some(&tools));
        let value = serde_json::to_value(&request).expect("request serializes");

        assert_eq!(
            value["tools"][0]["functionDeclarations"][0]["name"],
            "file_read"
        );
    }

    #[test]
    fn response_exposes_text_and_tool_calls() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "checking the directory"},
                        {"functionCall": {"name": "ls", "args": {"directory": "src"}}}
                    ]
                }
            }]
        }"#;
        let response: GoogleChatResponse = serde_json::from_str(raw).expect("response parses");

        assert_eq!(response.text().as_deref(), Some("checking the directory"));
        let calls = response.tool_calls().expect("tool calls present");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "ls");
        assert_eq!(calls[0].id, "ls-0");
        let args: Value =
            serde_json::from_str(&calls[0].function.arguments).expect("arguments are JSON");
        assert_eq!(args["directory"], "src");
    }

    #[tokio::test]
    async fn empty_api_key_is_an_auth_error() {
        let google = Google::new("", None, None, None, None, None, None);
        let messages = vec![ChatMessage::user().content("hi").build()];
        let err = google
            .chat_with_tools(&messages, None)
            .await
            .expect_err("missing key must fail");
        assert!(matches!(err, ModelError::Auth(_)));
    }

    #[tokio::test]
    async fn chat_round_trip_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "done"}]}}]}"#,
            )
            .create_async()
            .await;

        let google = Google::new(
            "test-key",
            Some(server.url()),
            None,
            None,
            None,
            None,
            None,
        );
        let messages = vec![ChatMessage::user().content("hi").build()];
        let response = google
            .chat_with_tools(&messages, None)
            .await
            .expect("chat succeeds");

        assert_eq!(response.text().as_deref(), Some("done"));
        assert!(response.tool_calls().is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn zero_candidates_is_a_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let google = Google::new(
            "test-key",
            Some(server.url()),
            None,
            None,
            None,
            None,
            None,
        );
        let messages = vec![ChatMessage::user().content("hi").build()];
        let err = google
            .chat_with_tools(&messages, None)
            .await
            .expect_err("no candidates must fail");
        assert!(matches!(err, ModelError::Provider(_)));
    }
}
