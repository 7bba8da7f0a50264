//! Domain layer for codemax
//!
//! This crate contains the core entities, value objects and pure functions.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Session**: the ordered conversation, changed only through
//!   [`session::reducer::reduce`]
//! - **Creation**: an HTML document extracted from a model response,
//!   kept in a [`CreationRegistry`] with one active entry
//! - **Turn**: one prompt/response cycle, tracked as a [`TurnPhase`]

pub mod core;
pub mod creation;
pub mod prompt;
pub mod session;
pub mod turn;

// Re-export commonly used types
pub use core::{error::DomainError, model::Model};
pub use creation::{
    entities::{Creation, CreationId},
    extractor::extract_document,
    registry::CreationRegistry,
};
pub use prompt::PromptTemplate;
pub use session::{
    entities::{InlineData, Message, Part, Role, Session},
    reducer::{STREAM_FAILURE_MESSAGE, SessionAction, reduce},
    stream::StreamEvent,
};
pub use turn::TurnPhase;
