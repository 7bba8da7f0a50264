//! Error types for the Gemini adapter

use codemax_application::ports::llm_gateway::GatewayError;
use thiserror::Error;

/// Result type alias for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur when talking to the Gemini API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("API key not found: set ${0} or provider.api_key")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl GeminiError {
    /// Build an API error from a non-success response body.
    ///
    /// Gemini wraps failures as `{"error": {"message": ...}}`; anything else
    /// is reported verbatim (truncated).
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<super::types::ApiErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| codemax_domain::core::string::truncate_str(body, 200).to_string());
        Self::Api { status, message }
    }
}

impl From<GeminiError> for GatewayError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::MissingApiKey(var) => GatewayError::AuthenticationFailed(format!(
                "API key not found: set ${} or provider.api_key",
                var
            )),
            GeminiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            GeminiError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            GeminiError::Http(e) => GatewayError::RequestFailed(e.to_string()),
            GeminiError::Api { status, message } => match status {
                401 | 403 => GatewayError::AuthenticationFailed(message),
                404 => GatewayError::ModelNotAvailable(message),
                _ => GatewayError::RequestFailed(format!("API error {}: {}", status, message)),
            },
        }
    }
}
