//! Prompt domain
//!
//! System instructions per model variant and the fixed follow-up prompts.

mod template;

pub use template::PromptTemplate;
