//! Conversation session domain.
//!
//! - [`entities::Session`]: an ordered conversation snapshot
//! - [`entities::Message`]: a single message with ordered parts
//! - [`reducer::reduce`]: the only way a session changes
//! - [`stream::StreamEvent`]: events of a streaming model response

pub mod entities;
pub mod reducer;
pub mod stream;
