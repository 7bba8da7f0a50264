//! Session transitions.
//!
//! Every change to a [`Session`] is expressed as a [`SessionAction`] and
//! applied by [`reduce`], which reads the current snapshot and returns a new
//! one. Streaming text therefore replaces the trailing model message in a
//! fresh list instead of being written through an alias to the old one.

use super::entities::{Message, Part, Role, Session};
use crate::core::error::DomainError;

/// Text written into the open model message when a stream fails.
pub const STREAM_FAILURE_MESSAGE: &str = "System error. Please retry.";

/// A transition on the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Append a user message.
    AppendUser(Message),
    /// Append an empty model message to stream into.
    OpenModelMessage { model_label: String },
    /// Replace the trailing model message's text with the cumulative text.
    ApplyIncrement { cumulative: String },
    /// Replace the trailing model message's text with [`STREAM_FAILURE_MESSAGE`],
    /// appending a fresh model message if the last one is not a model message.
    /// Either way the entry is marked failed.
    Fail,
    /// Drop every message.
    Clear,
}

/// Apply `action` to `session`, returning the next snapshot.
pub fn reduce(session: &Session, action: SessionAction) -> Result<Session, DomainError> {
    let mut messages = session.to_vec();

    match action {
        SessionAction::AppendUser(message) => {
            messages.push(message);
        }
        SessionAction::OpenModelMessage { model_label } => {
            messages.push(Message::placeholder(model_label));
        }
        SessionAction::ApplyIncrement { cumulative } => {
            let last = messages
                .last_mut()
                .filter(|m| m.role == Role::Model)
                .ok_or(DomainError::NoOpenMessage)?;
            set_text(last, cumulative);
        }
        SessionAction::Fail => match messages.last_mut() {
            Some(last) if last.role == Role::Model => {
                set_text(last, STREAM_FAILURE_MESSAGE.to_string());
                last.failed = true;
            }
            _ => messages.push(Message {
                failed: true,
                ..Message::model(STREAM_FAILURE_MESSAGE, None)
            }),
        },
        SessionAction::Clear => messages.clear(),
    }

    Ok(Session::from_messages(messages))
}

fn set_text(message: &mut Message, text: String) {
    match message.parts.iter_mut().find(|p| p.text.is_some()) {
        Some(part) => part.text = Some(text),
        None => message.parts.insert(0, Part::text(text)),
    }
}
