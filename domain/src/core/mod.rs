//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the CodeMax model variants and their backend ids
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: UTF-8 safe truncation helpers

pub mod error;
pub mod model;
pub mod string;
