//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface for CodeMax.

mod repl;

pub use repl::{ChatRepl, ReplCommand};
