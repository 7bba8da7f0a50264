//! Turn lifecycle.

mod phase;

pub use phase::TurnPhase;
