//! Session domain entities

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// Base64 payload attached inline to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    /// Base64 (standard alphabet) encoded bytes
    pub data: String,
    pub mime_type: String,
}

impl InlineData {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// One ordered piece of a message: text, inline data, or both
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(data: InlineData) -> Self {
        Self {
            text: None,
            inline_data: Some(data),
        }
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
    /// Model key that produced this message (model messages only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_label: Option<String>,
    /// Set on a model message that holds the stream failure notice rather
    /// than model output. Such entries are never sent back to the provider.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
}

impl Message {
    /// A user message: the prompt text, then the attachment if any.
    pub fn user(text: impl Into<String>, attachment: Option<InlineData>) -> Self {
        let mut parts = vec![Part::text(text)];
        if let Some(data) = attachment {
            parts.push(Part::inline(data));
        }
        Self {
            role: Role::User,
            parts,
            model_label: None,
            failed: false,
        }
    }

    /// An empty model message that streamed text will be written into.
    pub fn placeholder(model_label: impl Into<String>) -> Self {
        Self::model(String::new(), Some(model_label.into()))
    }

    pub fn model(text: impl Into<String>, model_label: Option<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
            model_label,
            failed: false,
        }
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn has_content(&self) -> bool {
        self.parts.iter().any(|p| {
            p.inline_data.is_some() || p.text.as_deref().is_some_and(|t| !t.is_empty())
        })
    }

    pub fn attachment(&self) -> Option<&InlineData> {
        self.parts.iter().find_map(|p| p.inline_data.as_ref())
    }
}

/// An ordered conversation (immutable snapshot)
///
/// Changes go through [`super::reducer::reduce`], which returns a new
/// snapshot rather than mutating this one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    messages: Vec<Message>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Title shown for the conversation: the first prompt, shortened.
    pub fn title(&self) -> Option<String> {
        self.messages
            .first()
            .map(|m| crate::core::string::ellipsize(&m.text(), 50))
    }

    pub(super) fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub(super) fn to_vec(&self) -> Vec<Message> {
        self.messages.clone()
    }
}
