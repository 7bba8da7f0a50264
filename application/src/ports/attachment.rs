//! Attachment loading port
//!
//! Turns an externally selected file into an inline payload for the next
//! user message.

use async_trait::async_trait;
use codemax_domain::InlineData;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading an attachment
#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Unsupported attachment type: {0} (expected an image or a PDF)")]
    UnsupportedType(String),

    #[error("Attachment too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },
}

/// Loads a file as base64 inline data with its MIME type
#[async_trait]
pub trait AttachmentLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<InlineData, AttachmentError>;
}
