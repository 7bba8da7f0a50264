//! Progress notification port
//!
//! Defines the interface for reporting turn progress while a response
//! streams in.

use codemax_domain::{Creation, Model};

/// Callback for progress updates during a turn
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait TurnProgressNotifier: Send + Sync {
    /// Called once the user and placeholder messages are in the session.
    fn on_turn_start(&self, model: &Model);

    /// Called with the full text received so far. Renderers replace what
    /// they showed before; they never append `cumulative` to it.
    fn on_increment(&self, cumulative: &str);

    /// Called when the stream completed.
    fn on_turn_settled(&self, _text: &str, _creation: Option<&Creation>) {}

    /// Called when the exchange failed and the fallback message was written.
    fn on_turn_failed(&self, _error: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {
    fn on_turn_start(&self, _model: &Model) {}
    fn on_increment(&self, _cumulative: &str) {}
}
