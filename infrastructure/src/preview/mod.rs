//! Preview rendering to the file system.

mod file_preview;

pub use file_preview::FilePreviewRenderer;
