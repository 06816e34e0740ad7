//! Application layer - the use cases gluing the engine together.
//!
//! One use case so far: handling a user turn against a loaded story,
//! from session initialization through processing to the dialog record.

mod turn;

pub use turn::{TickTurnHandler, TurnOutcome};
