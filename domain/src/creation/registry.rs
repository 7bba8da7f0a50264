//! Creation registry: history of extracted documents plus the active one.

use super::entities::{Creation, CreationId};
use crate::core::error::DomainError;

/// In-memory creation history, most recent first
#[derive(Debug, Clone, Default)]
pub struct CreationRegistry {
    history: Vec<Creation>,
    active: Option<CreationId>,
}

impl CreationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new creation at the front of the history and make it active.
    pub fn record_creation(&mut self, prompt_text: &str, html: &str) -> Creation {
        let creation = Creation::new(prompt_text, html);
        self.active = Some(creation.id);
        self.history.insert(0, creation.clone());
        creation
    }

    /// All creations, most recent first.
    pub fn list_creations(&self) -> &[Creation] {
        &self.history
    }

    /// Make an existing creation active. History order is unchanged.
    pub fn activate(&mut self, id: CreationId) -> Result<&Creation, DomainError> {
        let creation = self
            .history
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::CreationNotFound(id.to_string()))?;
        self.active = Some(id);
        Ok(creation)
    }

    pub fn current(&self) -> Option<&Creation> {
        let id = self.active?;
        self.history.iter().find(|c| c.id == id)
    }

    /// Deselect the active creation, keeping the history.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
