//! LLM Gateway port
//!
//! Defines the interface for communicating with the model provider.

use async_trait::async_trait;
use codemax_domain::{Message, Model, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with the
/// provider. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a chat session bound to a model and a system instruction
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Get available models
    async fn available_models(&self) -> Result<Vec<Model>, GatewayError>;
}

/// Handle for receiving streaming events from an LLM session.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream, calling `on_increment` with the cumulative text
    /// after every chunk, and return the final text.
    ///
    /// A `Completed` event with text and no preceding deltas counts as a
    /// single chunk. A channel closed before `Completed` is an error: the
    /// text seen so far may be truncated.
    pub async fn accumulate<F>(mut self, mut on_increment: F) -> Result<String, GatewayError>
    where
        F: FnMut(&str) + Send,
    {
        let mut full_text = String::new();
        let mut saw_delta = false;
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    saw_delta = true;
                    full_text.push_str(&chunk);
                    on_increment(&full_text);
                }
                StreamEvent::Completed(text) => {
                    if !saw_delta && !text.is_empty() {
                        full_text = text;
                        on_increment(&full_text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
                StreamEvent::TimedOut => return Err(GatewayError::Timeout),
            }
        }
        Err(GatewayError::TransportClosed)
    }
}

/// An active LLM session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model used by this session
    fn model(&self) -> &Model;

    /// Send the conversation (last element is the new user message) and
    /// get a streaming response.
    async fn send_streaming(&self, contents: &[Message]) -> Result<StreamHandle, GatewayError>;
}
