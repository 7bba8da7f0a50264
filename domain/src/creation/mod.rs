//! Creation domain.
//!
//! - [`extractor::extract_document`]: first HTML document in a response
//! - [`entities::Creation`]: a saved HTML artifact
//! - [`registry::CreationRegistry`]: history plus the active selection

pub mod entities;
pub mod extractor;
pub mod registry;
