//! Stream Relay use case.
//!
//! Forwards the conversation to the provider and republishes the
//! cumulative response text on every increment.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use codemax_domain::core::string::truncate_str;
use codemax_domain::{Message, Model, PromptTemplate, Role};
use std::sync::Arc;
use tracing::{debug, info};

/// Relays one streaming exchange per call
///
/// No retry: a failed exchange is returned to the caller as-is.
#[derive(Clone)]
pub struct StreamRelay {
    gateway: Arc<dyn LlmGateway>,
}

impl StreamRelay {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self { gateway }
    }

    /// Stream a reply to `history`, whose last element is the new user message.
    ///
    /// `on_increment` receives the full text so far after every chunk.
    /// Resolves with the final text once the provider ends the stream.
    pub async fn stream_chat<F>(
        &self,
        model: &Model,
        history: &[Message],
        on_increment: F,
    ) -> Result<String, GatewayError>
    where
        F: FnMut(&str) + Send,
    {
        let contents = Self::forwarded_contents(history);
        if contents.last().map(|m| m.role) != Some(Role::User) {
            return Err(GatewayError::RequestFailed(
                "conversation must end with a user message".to_string(),
            ));
        }

        info!(
            model = %model,
            backend = model.backend_id(),
            messages = contents.len(),
            "Opening stream: {}",
            truncate_str(&contents[contents.len() - 1].text(), 80)
        );

        let system_prompt = PromptTemplate::system_instruction(model);
        let session = self
            .gateway
            .create_session_with_system_prompt(model, &system_prompt)
            .await?;
        let handle = session.send_streaming(&contents).await?;
        let text = handle.accumulate(on_increment).await?;

        debug!(model = %model, bytes = text.len(), "Stream completed");
        Ok(text)
    }

    /// Messages worth sending.
    ///
    /// Unfilled model placeholders are dropped. A failed exchange is dropped
    /// as a pair: the failure notice is not model output, and the prompt it
    /// answered never got a reply.
    fn forwarded_contents(history: &[Message]) -> Vec<Message> {
        let mut contents: Vec<Message> = Vec::with_capacity(history.len());
        for message in history {
            if message.role == Role::Model && message.failed {
                if contents.last().is_some_and(|m| m.role == Role::User) {
                    contents.pop();
                }
                continue;
            }
            if message.role == Role::User || message.has_content() {
                contents.push(message.clone());
            }
        }
        contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{LlmSession, StreamHandle};
    use async_trait::async_trait;
    use codemax_domain::StreamEvent;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Session that replays scripted events and records what it was sent.
    struct ScriptedSession {
        model: Model,
        events: Vec<StreamEvent>,
        sent: Arc<Mutex<Vec<Message>>>,
    }

    #[async_trait]
    impl LlmSession for ScriptedSession {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn send_streaming(&self, contents: &[Message]) -> Result<StreamHandle, GatewayError> {
            *self.sent.lock().unwrap() = contents.to_vec();
            let (tx, rx) = mpsc::channel(self.events.len().max(1));
            for event in self.events.clone() {
                tx.send(event).await.unwrap();
            }
            Ok(StreamHandle::new(rx))
        }
    }

    struct ScriptedGateway {
        events: Vec<StreamEvent>,
        sent: Arc<Mutex<Vec<Message>>>,
        system_prompt: Arc<Mutex<Option<String>>>,
    }

    impl ScriptedGateway {
        fn new(events: Vec<StreamEvent>) -> Self {
            Self {
                events,
                sent: Arc::new(Mutex::new(Vec::new())),
                system_prompt: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn create_session_with_system_prompt(
            &self,
            model: &Model,
            system_prompt: &str,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            *self.system_prompt.lock().unwrap() = Some(system_prompt.to_string());
            Ok(Box::new(ScriptedSession {
                model: model.clone(),
                events: self.events.clone(),
                sent: self.sent.clone(),
            }))
        }

        async fn available_models(&self) -> Result<Vec<Model>, GatewayError> {
            Ok(Model::known_models())
        }
    }

    #[tokio::test]
    async fn test_stream_chat_delivers_cumulative_text() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            StreamEvent::Delta("c1".to_string()),
            StreamEvent::Delta("c2".to_string()),
            StreamEvent::Delta("c3".to_string()),
            StreamEvent::Completed(String::new()),
        ]));
        let relay = StreamRelay::new(gateway);

        let mut seen = Vec::new();
        let text = relay
            .stream_chat(
                &Model::CodeMaxPro,
                &[Message::user("hi", None)],
                |c| seen.push(c.to_string()),
            )
            .await
            .unwrap();

        assert_eq!(text, "c1c2c3");
        assert_eq!(seen, vec!["c1", "c1c2", "c1c2c3"]);
    }

    #[tokio::test]
    async fn test_stream_chat_uses_variant_system_instruction() {
        let gateway = Arc::new(ScriptedGateway::new(vec![StreamEvent::Completed(
            "ok".to_string(),
        )]));
        let relay = StreamRelay::new(gateway.clone());

        relay
            .stream_chat(&Model::CodeMaxBeta, &[Message::user("hi", None)], |_| {})
            .await
            .unwrap();

        let prompt = gateway.system_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("BETA Experimental"));
    }

    #[tokio::test]
    async fn test_stream_chat_drops_empty_placeholders() {
        let gateway = Arc::new(ScriptedGateway::new(vec![StreamEvent::Completed(
            "ok".to_string(),
        )]));
        let relay = StreamRelay::new(gateway.clone());

        let history = vec![
            Message::user("first", None),
            Message::model("answer", Some("codemax-pro".to_string())),
            Message::user("second", None),
            Message::placeholder("codemax-pro"),
        ];
        // A trailing placeholder is dropped, leaving the user message last.
        relay
            .stream_chat(&Model::CodeMaxPro, &history, |_| {})
            .await
            .unwrap();

        let sent = gateway.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].text(), "second");
    }

    #[tokio::test]
    async fn test_stream_chat_skips_failed_exchanges() {
        let gateway = Arc::new(ScriptedGateway::new(vec![StreamEvent::Completed(
            "ok".to_string(),
        )]));
        let relay = StreamRelay::new(gateway.clone());

        let history = vec![
            Message::user("first", None),
            Message {
                failed: true,
                ..Message::model("System error. Please retry.", Some("codemax-pro".to_string()))
            },
            Message::user("second", None),
        ];
        relay
            .stream_chat(&Model::CodeMaxPro, &history, |_| {})
            .await
            .unwrap();

        let sent = gateway.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text(), "second");
    }

    #[tokio::test]
    async fn test_stream_chat_requires_trailing_user_message() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let relay = StreamRelay::new(gateway);

        let err = relay
            .stream_chat(
                &Model::CodeMaxPro,
                &[Message::model("orphan", None)],
                |_| {},
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_stream_chat_propagates_stream_error() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            StreamEvent::Delta("half".to_string()),
            StreamEvent::Error("provider exploded".to_string()),
        ]));
        let relay = StreamRelay::new(gateway);

        let result = relay
            .stream_chat(&Model::CodeMax13, &[Message::user("hi", None)], |_| {})
            .await;
        assert!(result.is_err());
    }
}
