//! Chat controller use case.
//!
//! Owns the conversation state (session, creation registry, turn phase) and
//! drives one turn at a time:
//!
//! ```text
//! Idle → Sending → Streaming → Settled | Failed → Idle
//! ```
//!
//! State lives behind a mutex that is never held across an `.await`; the
//! generating flag is taken with a compare-and-swap so a second `send` while
//! a turn is in flight is rejected without touching the session.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::preview::{NoPreview, PreviewPort};
use crate::ports::progress::TurnProgressNotifier;
use crate::use_cases::stream_relay::StreamRelay;
use codemax_domain::core::string::truncate_str;
use codemax_domain::{
    Creation, CreationId, CreationRegistry, DomainError, InlineData, Message, Model,
    PromptTemplate, Role, Session, SessionAction, TurnPhase, extract_document, reduce,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by the chat controller
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChatError {
    #[error("Nothing to send: enter a prompt or attach a file")]
    EmptyInput,

    #[error("A response is still being generated")]
    TurnInFlight,

    #[error("No active creation")]
    NoActiveCreation,

    #[error("No message at index {0}")]
    NoSuchMessage(usize),

    #[error("Message {0} does not contain an HTML document")]
    NoDocument(usize),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A prompt to send, with an optional attachment
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub text: String,
    pub attachment: Option<InlineData>,
    pub model: Model,
}

impl SendRequest {
    pub fn new(text: impl Into<String>, model: Model) -> Self {
        Self {
            text: text.into(),
            attachment: None,
            model,
        }
    }

    pub fn with_attachment(mut self, attachment: Option<InlineData>) -> Self {
        self.attachment = attachment;
        self
    }

    fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachment.is_none()
    }
}

/// Result of a completed turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// `Settled` or `Failed`
    pub phase: TurnPhase,
    /// Final text of the model message
    pub text: String,
    /// Creation recorded from the response, if it contained a document
    pub creation: Option<Creation>,
    /// Stream failure description when `phase` is `Failed`
    pub error: Option<String>,
}

impl TurnOutcome {
    pub fn is_settled(&self) -> bool {
        self.phase == TurnPhase::Settled
    }
}

#[derive(Default)]
struct ChatState {
    session: Session,
    registry: CreationRegistry,
    phase: TurnPhase,
}

/// Use case coordinating the session store, stream relay, extractor and
/// creation registry.
pub struct ChatController {
    relay: StreamRelay,
    preview: Arc<dyn PreviewPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
    state: Mutex<ChatState>,
    generating: AtomicBool,
}

/// Releases the generating flag when a turn ends, however it ends.
struct GeneratingGuard<'a> {
    controller: &'a ChatController,
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.controller.state().phase = TurnPhase::Idle;
        self.controller.generating.store(false, Ordering::Release);
    }
}

impl ChatController {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            relay: StreamRelay::new(gateway),
            preview: Arc::new(NoPreview),
            conversation_logger: Arc::new(NoConversationLogger),
            state: Mutex::new(ChatState::default()),
            generating: AtomicBool::new(false),
        }
    }

    /// Create with a preview renderer.
    pub fn with_preview(mut self, preview: Arc<dyn PreviewPort>) -> Self {
        self.preview = preview;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, action: SessionAction) -> Result<(), DomainError> {
        let mut state = self.state();
        state.session = reduce(&state.session, action)?;
        Ok(())
    }

    /// Run one turn.
    ///
    /// Stream failures are not errors: the placeholder receives the fallback
    /// message and the outcome's phase is `Failed`.
    pub async fn send(
        &self,
        request: SendRequest,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnOutcome, ChatError> {
        if request.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        if self
            .generating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ChatError::TurnInFlight);
        }
        let _guard = GeneratingGuard { controller: self };

        let SendRequest {
            text: prompt_text,
            attachment,
            model,
        } = request;

        self.conversation_logger.log(ConversationEvent::new(
            "user_message",
            json!({
                "model": model.key(),
                "text": prompt_text,
                "attachment": attachment.as_ref().map(|a| a.mime_type.clone()),
            }),
        ));

        let history = {
            let mut state = self.state();
            state.phase = TurnPhase::Sending;
            let session = reduce(
                &state.session,
                SessionAction::AppendUser(Message::user(prompt_text.clone(), attachment)),
            )?;
            let history = session.messages().to_vec();
            state.session = reduce(
                &session,
                SessionAction::OpenModelMessage {
                    model_label: model.key().to_string(),
                },
            )?;
            state.phase = TurnPhase::Streaming;
            history
        };
        progress.on_turn_start(&model);

        let result = self
            .relay
            .stream_chat(&model, &history, |cumulative| {
                if let Err(e) = self.apply(SessionAction::ApplyIncrement {
                    cumulative: cumulative.to_string(),
                }) {
                    warn!("Dropping increment: {}", e);
                    return;
                }
                progress.on_increment(cumulative);
            })
            .await;

        let outcome = match result {
            Ok(text) => self.settle(&prompt_text, &model, text, progress),
            Err(e) => {
                warn!(model = %model, "Stream failed: {}", e);
                self.apply(SessionAction::Fail)?;
                self.state().phase = TurnPhase::Failed;
                self.conversation_logger.log(ConversationEvent::new(
                    "stream_failed",
                    json!({ "model": model.key(), "error": e.to_string() }),
                ));
                let error = e.to_string();
                progress.on_turn_failed(&error);
                TurnOutcome {
                    phase: TurnPhase::Failed,
                    text: codemax_domain::STREAM_FAILURE_MESSAGE.to_string(),
                    creation: None,
                    error: Some(error),
                }
            }
        };
        debug!(phase = %outcome.phase, model = %model, "Turn finished");
        Ok(outcome)
    }

    fn settle(
        &self,
        prompt_text: &str,
        model: &Model,
        text: String,
        progress: &dyn TurnProgressNotifier,
    ) -> TurnOutcome {
        self.conversation_logger.log(ConversationEvent::new(
            "model_response",
            json!({ "model": model.key(), "bytes": text.len(), "text": text }),
        ));

        let creation = {
            let mut state = self.state();
            state.phase = TurnPhase::Settled;
            extract_document(&text).map(|html| state.registry.record_creation(prompt_text, html))
        };

        if let Some(creation) = &creation {
            info!(
                id = %creation.id,
                bytes = creation.html.len(),
                "Recorded creation '{}'",
                creation.name
            );
            self.conversation_logger.log(ConversationEvent::new(
                "creation_recorded",
                json!({
                    "id": creation.id.to_string(),
                    "name": creation.name,
                    "bytes": creation.html.len(),
                }),
            ));
            self.show_preview(creation);
        }

        progress.on_turn_settled(&text, creation.as_ref());
        TurnOutcome {
            phase: TurnPhase::Settled,
            text,
            creation,
            error: None,
        }
    }

    fn show_preview(&self, creation: &Creation) {
        if let Err(e) = self.preview.show(creation) {
            warn!("Preview failed for {}: {}", creation.id, e);
        }
    }

    /// Ask the model to audit and fix the active creation.
    pub async fn verify_active(
        &self,
        model: Model,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnOutcome, ChatError> {
        let html = self
            .active_creation()
            .map(|c| c.html)
            .ok_or(ChatError::NoActiveCreation)?;
        self.send(
            SendRequest::new(PromptTemplate::verify_prompt(&html), model),
            progress,
        )
        .await
    }

    /// Clear the conversation and the active selection. History is kept.
    pub fn new_chat(&self) -> Result<(), ChatError> {
        if self.is_generating() {
            return Err(ChatError::TurnInFlight);
        }
        {
            let mut state = self.state();
            state.session = reduce(&state.session, SessionAction::Clear)?;
            state.registry.clear_active();
        }
        self.clear_preview();
        self.conversation_logger
            .log(ConversationEvent::new("chat_reset", json!({})));
        Ok(())
    }

    /// Make a past creation the active one.
    pub fn select_creation(&self, id: CreationId) -> Result<Creation, ChatError> {
        let creation = self.state().registry.activate(id)?.clone();
        self.conversation_logger.log(ConversationEvent::new(
            "creation_selected",
            json!({ "id": id.to_string(), "name": creation.name }),
        ));
        self.show_preview(&creation);
        Ok(creation)
    }

    /// Show the document contained in message `index` without recording it.
    ///
    /// The preview is temporary: the registry and the active selection are
    /// left as they are. The returned creation is named after the prompt the
    /// message answered.
    pub fn preview_message(&self, index: usize) -> Result<Creation, ChatError> {
        let creation = {
            let state = self.state();
            let messages = state.session.messages();
            let message = messages.get(index).ok_or(ChatError::NoSuchMessage(index))?;
            if message.role != Role::Model || message.failed {
                return Err(ChatError::NoDocument(index));
            }
            let text = message.text();
            let html = extract_document(&text).ok_or(ChatError::NoDocument(index))?;
            let prompt = messages[..index]
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.text())
                .unwrap_or_default();
            Creation::new(&prompt, html)
        };

        self.conversation_logger.log(ConversationEvent::new(
            "message_previewed",
            json!({ "index": index, "bytes": creation.html.len() }),
        ));
        self.show_preview(&creation);
        Ok(creation)
    }

    /// Deselect the active creation without touching the conversation.
    pub fn reset_preview(&self) {
        self.state().registry.clear_active();
        self.clear_preview();
    }

    fn clear_preview(&self) {
        if let Err(e) = self.preview.clear() {
            warn!("Failed to clear preview: {}", e);
        }
    }

    /// All creations, most recent first.
    pub fn creations(&self) -> Vec<Creation> {
        self.state().registry.list_creations().to_vec()
    }

    pub fn active_creation(&self) -> Option<Creation> {
        self.state().registry.current().cloned()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state().session.messages().to_vec()
    }

    pub fn phase(&self) -> TurnPhase {
        self.state().phase
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    /// One-line description of the conversation for headers.
    pub fn title(&self) -> Option<String> {
        self.state()
            .session
            .title()
            .map(|t| truncate_str(&t, 80).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{GatewayError, LlmSession, StreamHandle};
    use crate::ports::preview::PreviewError;
    use crate::ports::progress::NoTurnProgress;
    use async_trait::async_trait;
    use codemax_domain::{Role, STREAM_FAILURE_MESSAGE, StreamEvent};
    use std::collections::VecDeque;
    use tokio::sync::{Notify, mpsc};

    const PAGE: &str = "<!DOCTYPE html><html><body>Hello</body></html>";

    /// What the mock session does when asked to stream.
    enum Script {
        Events(Vec<StreamEvent>),
        Fail,
        /// Emit one delta, then wait for the notify before completing.
        Hold(Arc<Notify>),
    }

    struct MockSession {
        model: Model,
        script: Mutex<Option<Script>>,
        sent: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    #[async_trait]
    impl LlmSession for MockSession {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn send_streaming(&self, contents: &[Message]) -> Result<StreamHandle, GatewayError> {
            self.sent.lock().unwrap().push(contents.to_vec());
            let script = self.script.lock().unwrap().take();
            match script {
                Some(Script::Events(events)) => {
                    let (tx, rx) = mpsc::channel(events.len().max(1));
                    for event in events {
                        tx.send(event).await.unwrap();
                    }
                    Ok(StreamHandle::new(rx))
                }
                Some(Script::Hold(release)) => {
                    let (tx, rx) = mpsc::channel(4);
                    tx.send(StreamEvent::Delta("thinking".to_string()))
                        .await
                        .unwrap();
                    tokio::spawn(async move {
                        release.notified().await;
                        let _ = tx.send(StreamEvent::Completed(String::new())).await;
                    });
                    Ok(StreamHandle::new(rx))
                }
                Some(Script::Fail) | None => {
                    Err(GatewayError::ConnectionError("network down".to_string()))
                }
            }
        }
    }

    struct MockGateway {
        scripts: Mutex<VecDeque<Script>>,
        /// Contents passed to each `send_streaming` call, in order
        sent: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    impl MockGateway {
        fn new(scripts: Vec<Script>) -> Arc<Self> {
            Arc::new(Self {
                scripts: Mutex::new(scripts.into()),
                sent: Arc::new(Mutex::new(Vec::new())),
            })
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn create_session_with_system_prompt(
            &self,
            model: &Model,
            _system_prompt: &str,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            let script = self.scripts.lock().unwrap().pop_front();
            Ok(Box::new(MockSession {
                model: model.clone(),
                script: Mutex::new(script),
                sent: self.sent.clone(),
            }))
        }

        async fn available_models(&self) -> Result<Vec<Model>, GatewayError> {
            Ok(Model::known_models())
        }
    }

    fn deltas(chunks: &[&str]) -> Script {
        let mut events: Vec<_> = chunks
            .iter()
            .map(|c| StreamEvent::Delta(c.to_string()))
            .collect();
        events.push(StreamEvent::Completed(String::new()));
        Script::Events(events)
    }

    /// Records the session length and placeholder text at every increment.
    struct Recorder<'a> {
        controller: &'a ChatController,
        observed: Mutex<Vec<(usize, String)>>,
    }

    impl TurnProgressNotifier for Recorder<'_> {
        fn on_turn_start(&self, _model: &Model) {}

        fn on_increment(&self, _cumulative: &str) {
            let messages = self.controller.messages();
            let last = messages.last().map(|m| m.text()).unwrap_or_default();
            self.observed.lock().unwrap().push((messages.len(), last));
        }
    }

    #[derive(Default)]
    struct RecordingPreview {
        shown: Mutex<Vec<CreationId>>,
        cleared: Mutex<usize>,
    }

    impl PreviewPort for RecordingPreview {
        fn show(&self, creation: &Creation) -> Result<(), PreviewError> {
            self.shown.lock().unwrap().push(creation.id);
            Ok(())
        }

        fn clear(&self) -> Result<(), PreviewError> {
            *self.cleared.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        types: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.types.lock().unwrap().push(event.event_type);
        }
    }

    #[tokio::test]
    async fn test_send_appends_user_and_placeholder_before_first_increment() {
        let controller = ChatController::new(MockGateway::new(vec![deltas(&["a", "b", "c"])]));
        let recorder = Recorder {
            controller: &controller,
            observed: Mutex::new(Vec::new()),
        };

        controller
            .send(SendRequest::new("hello", Model::CodeMaxPro), &recorder)
            .await
            .unwrap();

        let observed = recorder.observed.lock().unwrap().clone();
        assert_eq!(
            observed,
            vec![
                (2, "a".to_string()),
                (2, "ab".to_string()),
                (2, "abc".to_string()),
            ]
        );
        let messages = controller.messages();
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Model);
        assert_eq!(messages[1].model_label.as_deref(), Some("codemax-pro"));
    }

    #[tokio::test]
    async fn test_placeholder_holds_last_cumulative_text() {
        let controller = ChatController::new(MockGateway::new(vec![deltas(&["c1", "c2", "c3"])]));

        let outcome = controller
            .send(SendRequest::new("hi", Model::CodeMax13), &NoTurnProgress)
            .await
            .unwrap();

        assert!(outcome.is_settled());
        assert_eq!(outcome.text, "c1c2c3");
        assert_eq!(controller.messages().last().unwrap().text(), "c1c2c3");
        assert_eq!(controller.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_document_response_records_active_creation() {
        let preview = Arc::new(RecordingPreview::default());
        let controller = ChatController::new(MockGateway::new(vec![deltas(&[
            "Sure! ",
            "<!DOCTYPE html><html><body>",
            "Hello</body></html>",
        ])]))
        .with_preview(preview.clone());

        let outcome = controller
            .send(SendRequest::new("Build me a page", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();

        let creation = outcome.creation.expect("creation recorded");
        assert_eq!(creation.name, "Build me a page...");
        assert_eq!(creation.html, PAGE);
        assert_eq!(controller.creations()[0].id, creation.id);
        assert_eq!(controller.active_creation().unwrap().id, creation.id);
        assert_eq!(*preview.shown.lock().unwrap(), vec![creation.id]);
    }

    #[tokio::test]
    async fn test_new_creations_go_to_front() {
        let controller = ChatController::new(MockGateway::new(vec![
            deltas(&["<html>one</html>"]),
            deltas(&["<html>two</html>"]),
        ]));

        controller
            .send(SendRequest::new("first", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();
        controller
            .send(SendRequest::new("second", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();

        let names: Vec<_> = controller.creations().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["second...", "first..."]);
        assert_eq!(controller.active_creation().unwrap().name, "second...");
    }

    #[tokio::test]
    async fn test_plain_text_response_records_nothing() {
        let controller =
            ChatController::new(MockGateway::new(vec![deltas(&["just ", "an explanation"])]));

        let outcome = controller
            .send(SendRequest::new("Explain", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();

        assert!(outcome.is_settled());
        assert!(outcome.creation.is_none());
        assert!(controller.creations().is_empty());
    }

    #[tokio::test]
    async fn test_stream_failure_writes_fallback_message() {
        let logger = Arc::new(RecordingLogger::default());
        let controller = ChatController::new(MockGateway::new(vec![Script::Events(vec![
            StreamEvent::Delta("<html>half".to_string()),
            StreamEvent::Error("quota exceeded".to_string()),
        ])]))
        .with_conversation_logger(logger.clone());

        let outcome = controller
            .send(SendRequest::new("Build me a page", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();

        assert_eq!(outcome.phase, TurnPhase::Failed);
        assert!(outcome.error.unwrap().contains("quota exceeded"));
        assert_eq!(
            controller.messages().last().unwrap().text(),
            STREAM_FAILURE_MESSAGE
        );
        assert_eq!(controller.messages().len(), 2);
        assert!(!controller.is_generating());
        assert_eq!(controller.phase(), TurnPhase::Idle);
        assert!(controller.creations().is_empty());
        assert!(logger.types.lock().unwrap().contains(&"stream_failed"));
    }

    #[tokio::test]
    async fn test_connection_failure_writes_fallback_message() {
        let controller = ChatController::new(MockGateway::new(vec![Script::Fail]));

        let outcome = controller
            .send(SendRequest::new("hi", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();

        assert_eq!(outcome.phase, TurnPhase::Failed);
        assert_eq!(outcome.text, STREAM_FAILURE_MESSAGE);
        assert!(!controller.is_generating());
    }

    #[tokio::test]
    async fn test_failed_exchange_is_not_sent_on_next_turn() {
        let gateway = MockGateway::new(vec![Script::Fail, deltas(&["fine"])]);
        let controller = ChatController::new(gateway.clone());

        let failed = controller
            .send(SendRequest::new("first", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();
        assert_eq!(failed.phase, TurnPhase::Failed);

        let outcome = controller
            .send(SendRequest::new("second", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();
        assert!(outcome.is_settled());

        // The fallback stays visible in the session...
        let messages = controller.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].text(), STREAM_FAILURE_MESSAGE);
        assert!(messages[1].failed);

        // ...but the provider only sees the new prompt.
        let sent = gateway.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        let second: Vec<_> = sent[1].iter().map(|m| (m.role, m.text())).collect();
        assert_eq!(second, vec![(Role::User, "second".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let controller = ChatController::new(MockGateway::new(vec![]));

        let err = controller
            .send(SendRequest::new("   ", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap_err();

        assert_eq!(err, ChatError::EmptyInput);
        assert!(controller.messages().is_empty());
    }

    #[tokio::test]
    async fn test_attachment_only_request_is_sent() {
        let controller = ChatController::new(MockGateway::new(vec![deltas(&["a cat"])]));

        controller
            .send(
                SendRequest::new("", Model::CodeMaxPro)
                    .with_attachment(Some(InlineData::new("iVBORw0K", "image/png"))),
                &NoTurnProgress,
            )
            .await
            .unwrap();

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].attachment().unwrap().mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_send_while_generating_has_no_effect() {
        let release = Arc::new(Notify::new());
        let controller = Arc::new(ChatController::new(MockGateway::new(vec![Script::Hold(
            release.clone(),
        )])));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .send(SendRequest::new("first", Model::CodeMaxPro), &NoTurnProgress)
                    .await
            })
        };

        while controller.messages().last().map(|m| m.text()) != Some("thinking".to_string()) {
            tokio::task::yield_now().await;
        }
        assert!(controller.is_generating());
        assert_eq!(controller.phase(), TurnPhase::Streaming);

        let err = controller
            .send(SendRequest::new("second", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::TurnInFlight);
        assert_eq!(controller.messages().len(), 2);
        assert_eq!(controller.new_chat(), Err(ChatError::TurnInFlight));

        release.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(outcome.is_settled());
        assert_eq!(controller.messages().len(), 2);
        assert!(!controller.is_generating());
    }

    #[tokio::test]
    async fn test_verify_active_sends_fixed_prompt() {
        let controller = ChatController::new(MockGateway::new(vec![
            deltas(&[PAGE]),
            deltas(&["<html><body>Fixed</body></html>"]),
        ]));

        controller
            .send(SendRequest::new("Build me a page", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();
        let outcome = controller
            .verify_active(Model::CodeMaxPro, &NoTurnProgress)
            .await
            .unwrap();

        let messages = controller.messages();
        assert_eq!(
            messages[2].text(),
            format!("Verify and fix this code for any potential issues:\n\n{}", PAGE)
        );
        let creation = outcome.creation.unwrap();
        assert_eq!(creation.name, "Verify and fix this code for a...");
        assert_eq!(controller.creations().len(), 2);
    }

    #[tokio::test]
    async fn test_verify_without_active_creation() {
        let controller = ChatController::new(MockGateway::new(vec![]));
        let err = controller
            .verify_active(Model::CodeMaxPro, &NoTurnProgress)
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::NoActiveCreation);
    }

    #[tokio::test]
    async fn test_new_chat_clears_session_and_selection_but_keeps_history() {
        let preview = Arc::new(RecordingPreview::default());
        let controller = ChatController::new(MockGateway::new(vec![deltas(&[PAGE])]))
            .with_preview(preview.clone());

        controller
            .send(SendRequest::new("Build me a page", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();
        controller.new_chat().unwrap();

        assert!(controller.messages().is_empty());
        assert!(controller.active_creation().is_none());
        assert_eq!(controller.creations().len(), 1);
        assert_eq!(*preview.cleared.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_select_creation_keeps_order() {
        let controller = ChatController::new(MockGateway::new(vec![
            deltas(&["<html>one</html>"]),
            deltas(&["<html>two</html>"]),
        ]));
        for prompt in ["first", "second"] {
            controller
                .send(SendRequest::new(prompt, Model::CodeMaxPro), &NoTurnProgress)
                .await
                .unwrap();
        }

        let older = controller.creations()[1].clone();
        let selected = controller.select_creation(older.id).unwrap();

        assert_eq!(selected.id, older.id);
        assert_eq!(controller.active_creation().unwrap().id, older.id);
        assert_eq!(controller.creations()[1].id, older.id);

        let missing = controller.select_creation(CreationId::new()).unwrap_err();
        assert!(matches!(missing, ChatError::Domain(DomainError::CreationNotFound(_))));
    }

    #[tokio::test]
    async fn test_preview_message_shows_without_recording() {
        let preview = Arc::new(RecordingPreview::default());
        let logger = Arc::new(RecordingLogger::default());
        let controller = ChatController::new(MockGateway::new(vec![
            deltas(&["Here you go: ", PAGE]),
            deltas(&["<html>two</html>"]),
        ]))
        .with_preview(preview.clone())
        .with_conversation_logger(logger.clone());
        for prompt in ["Build me a page", "Another one"] {
            controller
                .send(SendRequest::new(prompt, Model::CodeMaxPro), &NoTurnProgress)
                .await
                .unwrap();
        }
        let active = controller.active_creation().unwrap();

        let shown = controller.preview_message(1).unwrap();

        assert_eq!(shown.html, PAGE);
        assert_eq!(shown.name, "Build me a page...");
        assert_eq!(controller.creations().len(), 2);
        assert!(controller.creations().iter().all(|c| c.id != shown.id));
        assert_eq!(controller.active_creation().unwrap().id, active.id);
        assert_eq!(preview.shown.lock().unwrap().last(), Some(&shown.id));
        assert!(logger.types.lock().unwrap().contains(&"message_previewed"));
    }

    #[tokio::test]
    async fn test_preview_message_rejects_messages_without_document() {
        let controller = ChatController::new(MockGateway::new(vec![
            deltas(&["just text"]),
            Script::Fail,
        ]));
        for prompt in ["Explain", "Build me a page"] {
            controller
                .send(SendRequest::new(prompt, Model::CodeMaxPro), &NoTurnProgress)
                .await
                .unwrap();
        }

        assert_eq!(controller.preview_message(0), Err(ChatError::NoDocument(0)));
        assert_eq!(controller.preview_message(1), Err(ChatError::NoDocument(1)));
        assert_eq!(controller.preview_message(3), Err(ChatError::NoDocument(3)));
        assert_eq!(controller.preview_message(9), Err(ChatError::NoSuchMessage(9)));
    }

    #[tokio::test]
    async fn test_reset_preview_keeps_conversation() {
        let controller = ChatController::new(MockGateway::new(vec![deltas(&[PAGE])]));
        controller
            .send(SendRequest::new("Build me a page", Model::CodeMaxPro), &NoTurnProgress)
            .await
            .unwrap();

        controller.reset_preview();

        assert!(controller.active_creation().is_none());
        assert_eq!(controller.messages().len(), 2);
        assert_eq!(controller.title().as_deref(), Some("Build me a page..."));
    }
}
