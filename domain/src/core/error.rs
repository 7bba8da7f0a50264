//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Creation not found: {0}")]
    CreationNotFound(String),

    #[error("No open model message to update")]
    NoOpenMessage,
}

impl DomainError {
    /// Check if this error refers to a missing creation
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::CreationNotFound(_))
    }
}
