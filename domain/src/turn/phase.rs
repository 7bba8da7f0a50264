//! Phases of a single prompt/response cycle

use serde::{Deserialize, Serialize};

/// Where the current turn is in its lifecycle
///
/// ```text
/// Idle → Sending → Streaming → Settled ┐
///                            └ Failed  ┴→ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    Idle,
    Sending,
    Streaming,
    Settled,
    Failed,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Sending => "sending",
            TurnPhase::Streaming => "streaming",
            TurnPhase::Settled => "settled",
            TurnPhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
