//! Streaming events for model communication.
//!
//! [`StreamEvent`] represents individual events in a streaming model
//! response, enabling real-time display of output as it's generated.

/// An event in a streaming model response.
///
/// Bridges infrastructure-level streaming (SSE chunks from the provider)
/// to the application layer. `Delta` carries only the new text; the
/// application accumulates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text chunk from the model.
    Delta(String),
    /// End of stream. Carries the full text when the provider supplies it,
    /// otherwise an empty string.
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
    /// The provider went quiet for longer than the read timeout.
    TimedOut,
}
