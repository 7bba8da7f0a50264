//! File attachments for user messages.

mod file_loader;

pub use file_loader::{LocalAttachmentLoader, mime_type_for};
