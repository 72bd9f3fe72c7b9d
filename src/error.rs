use thiserror::Error;

/// Errors that can occur when talking to the model provider.
#[derive(Debug, Error)]
pub enum ModelError {
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(String),
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    Auth(String),
    /// Invalid request parameters or format
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Errors returned by the provider itself
    #[error("Provider error: {0}")]
    Provider(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormat {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    Json(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Json(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}
