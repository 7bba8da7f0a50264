//! Application layer for codemax
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    attachment::{AttachmentError, AttachmentLoader},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession, StreamHandle},
    preview::{NoPreview, PreviewError, PreviewPort},
    progress::{NoTurnProgress, TurnProgressNotifier},
};
pub use use_cases::chat_controller::{ChatController, ChatError, SendRequest, TurnOutcome};
pub use use_cases::stream_relay::StreamRelay;
