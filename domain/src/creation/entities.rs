//! Creation entity

use crate::core::string::ellipsize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Characters of the prompt kept in a creation's name.
pub const CREATION_NAME_CHARS: usize = 30;

/// Unique identifier of a creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreationId(Uuid);

impl CreationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CreationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CreationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CreationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// An HTML document extracted from a model response (Entity)
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creation {
    pub id: CreationId,
    /// Shortened prompt that produced the document
    pub name: String,
    pub html: String,
    pub created_at: DateTime<Utc>,
}

impl Creation {
    pub fn new(prompt_text: &str, html: impl Into<String>) -> Self {
        Self {
            id: CreationId::new(),
            name: ellipsize(prompt_text, CREATION_NAME_CHARS),
            html: html.into(),
            created_at: Utc::now(),
        }
    }
}
