//! Gemini adapter
//!
//! Implements the [`LlmGateway`](codemax_application::LlmGateway) port over
//! the `streamGenerateContent` endpoint with server-sent events.

pub mod error;
pub mod gateway;
pub mod session;
pub mod sse;
pub mod types;
