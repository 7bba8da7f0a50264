//! Preview port
//!
//! The active creation's HTML is handed to an external renderer, which is
//! responsible for sandboxed display.

use codemax_domain::Creation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Preview I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Displays the active creation
pub trait PreviewPort: Send + Sync {
    /// Show `creation` as the current preview.
    fn show(&self, creation: &Creation) -> Result<(), PreviewError>;

    /// Remove the current preview.
    fn clear(&self) -> Result<(), PreviewError>;
}

/// Preview disabled
pub struct NoPreview;

impl PreviewPort for NoPreview {
    fn show(&self, _creation: &Creation) -> Result<(), PreviewError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), PreviewError> {
        Ok(())
    }
}
