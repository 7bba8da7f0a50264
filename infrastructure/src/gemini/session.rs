//! Gemini session: one streaming `streamGenerateContent` call per turn.
//!
//! The API is stateless, so the caller passes the whole conversation on
//! every call and the session only carries the model and system prompt.

use super::error::GeminiError;
use super::sse::SseDecoder;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use codemax_application::ports::llm_gateway::{GatewayError, LlmSession, StreamHandle};
use codemax_domain::core::string::truncate_str;
use codemax_domain::{Message, Model, StreamEvent};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const STREAM_CHANNEL_CAPACITY: usize = 64;

/// Connection details shared by every session of a gateway
#[derive(Debug)]
pub(crate) struct Endpoint {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_key: String,
}

impl Endpoint {
    fn stream_url(&self, backend_id: &str) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url.trim_end_matches('/'),
            backend_id
        )
    }
}

pub struct GeminiSession {
    endpoint: Arc<Endpoint>,
    model: Model,
    system_prompt: String,
}

impl GeminiSession {
    pub(crate) fn new(endpoint: Arc<Endpoint>, model: Model, system_prompt: String) -> Self {
        Self {
            endpoint,
            model,
            system_prompt,
        }
    }

    async fn open_stream(&self, contents: &[Message]) -> Result<reqwest::Response, GeminiError> {
        let url = self.endpoint.stream_url(self.model.backend_id());
        let request = GenerateContentRequest::new(&self.system_prompt, contents);

        debug!(
            model = self.model.backend_id(),
            contents = request.contents.len(),
            "Calling Gemini streamGenerateContent"
        );

        let response = self
            .endpoint
            .client
            .post(&url)
            .header("x-goog-api-key", &self.endpoint.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini error {}: {}", status.as_u16(), truncate_str(&body, 500));
            return Err(GeminiError::from_response(status.as_u16(), &body));
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send_streaming(&self, contents: &[Message]) -> Result<StreamHandle, GatewayError> {
        let response = self.open_stream(contents).await?;

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        tokio::spawn(forward_events(response.bytes_stream(), tx));
        Ok(StreamHandle::new(rx))
    }
}

/// What one SSE payload means for the stream
#[derive(Debug, PartialEq)]
enum Payload {
    Text(String),
    Empty,
    Failure(String),
}

fn interpret(data: &str) -> Payload {
    if data.trim() == "[DONE]" {
        return Payload::Empty;
    }
    let event: GenerateContentResponse = match serde_json::from_str(data) {
        Ok(event) => event,
        Err(e) => {
            return Payload::Failure(format!(
                "Malformed stream event ({}): {}",
                e,
                truncate_str(data, 200)
            ));
        }
    };
    if let Some(failure) = event.failure() {
        return Payload::Failure(failure);
    }
    let text = event.text();
    if text.is_empty() {
        Payload::Empty
    } else {
        Payload::Text(text)
    }
}

/// Decode the SSE body and forward it as stream events.
///
/// Ends with exactly one terminal event unless the receiver was dropped.
async fn forward_events<S, B>(body: S, tx: mpsc::Sender<StreamEvent>)
where
    S: Stream<Item = Result<B, reqwest::Error>>,
    B: AsRef<[u8]>,
{
    let mut body = std::pin::pin!(body);
    let mut decoder = SseDecoder::new();
    let mut full_text = String::new();

    while let Some(chunk) = body.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) if e.is_timeout() => {
                warn!("Gemini stream stalled: {}", e);
                let _ = tx.send(StreamEvent::TimedOut).await;
                return;
            }
            Err(e) => {
                let _ = tx
                    .send(StreamEvent::Error(format!("Stream read error: {}", e)))
                    .await;
                return;
            }
        };
        for data in decoder.push(bytes.as_ref()) {
            if !relay(&data, &mut full_text, &tx).await {
                return;
            }
        }
    }
    if let Some(data) = decoder.finish()
        && !relay(&data, &mut full_text, &tx).await
    {
        return;
    }

    debug!(bytes = full_text.len(), "Gemini stream finished");
    let _ = tx.send(StreamEvent::Completed(full_text)).await;
}

/// Forward one payload; returns false once the stream should stop.
async fn relay(data: &str, full_text: &mut String, tx: &mpsc::Sender<StreamEvent>) -> bool {
    match interpret(data) {
        Payload::Text(text) => {
            full_text.push_str(&text);
            tx.send(StreamEvent::Delta(text)).await.is_ok()
        }
        Payload::Empty => true,
        Payload::Failure(message) => {
            warn!("Gemini stream failed: {}", message);
            let _ = tx.send(StreamEvent::Error(message)).await;
            false
        }
    }
}
