//! Local file system attachment loader
//!
//! [`LocalAttachmentLoader`] implements the
//! [`AttachmentLoader`](codemax_application::AttachmentLoader) port: the file
//! is read with `tokio::fs`, its MIME type is taken from the extension, and
//! the bytes are base64 encoded (standard alphabet) for `inlineData`.
//!
//! # Example
//!
//! ```ignore
//! use codemax_infrastructure::LocalAttachmentLoader;
//! use codemax_application::AttachmentLoader;
//!
//! let loader = LocalAttachmentLoader::new(20 * 1024 * 1024);
//! let inline = loader.load(Path::new("mockup.png")).await?;
//! assert_eq!(inline.mime_type, "image/png");
//! ```

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use codemax_application::ports::attachment::{AttachmentError, AttachmentLoader};
use codemax_domain::InlineData;
use std::path::Path;
use tracing::debug;

/// MIME type for a supported attachment, by file extension
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

/// Attachment loader reading from the local file system
#[derive(Debug, Clone)]
pub struct LocalAttachmentLoader {
    max_bytes: u64,
}

impl LocalAttachmentLoader {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

#[async_trait]
impl AttachmentLoader for LocalAttachmentLoader {
    async fn load(&self, path: &Path) -> Result<InlineData, AttachmentError> {
        let io_error = |e: std::io::Error| AttachmentError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mime_type = mime_type_for(path)
            .ok_or_else(|| AttachmentError::UnsupportedType(path.display().to_string()))?;

        // Check the size before reading so oversized files are never buffered
        let size = tokio::fs::metadata(path).await.map_err(io_error)?.len();
        if size > self.max_bytes {
            return Err(AttachmentError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(io_error)?;
        debug!(path = %path.display(), mime_type, bytes = bytes.len(), "Attachment loaded");

        Ok(InlineData::new(STANDARD.encode(&bytes), mime_type))
    }
}
