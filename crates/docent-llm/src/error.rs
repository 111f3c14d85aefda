//! Error types for calls to the external model services.

/// Errors from the LLM and embedding endpoints.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("request timed out after {0} seconds")]
    Timeout(u64),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("cannot embed empty text")]
    EmptyInput,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LlmError::MalformedResponse(err.to_string())
        } else {
            LlmError::Http(err.to_string())
        }
    }
}
