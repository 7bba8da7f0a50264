//! Infrastructure layer for codemax
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod attachment;
pub mod config;
pub mod gemini;
pub mod logging;
pub mod preview;

// Re-export commonly used types
pub use attachment::LocalAttachmentLoader;
pub use config::{
    ConfigLoader, ConfigValidationError, FileChatConfig, FileConfig, FileLoggingConfig,
    FilePreviewConfig, FileProviderConfig, FileReplConfig,
};
pub use gemini::{
    error::{GeminiError, Result},
    gateway::GeminiLlmGateway,
    session::GeminiSession,
};
pub use logging::JsonlConversationLogger;
pub use preview::FilePreviewRenderer;
