//! State machine module.
//!
//! Stories author a nested, xstate-like tree of states; the engine never
//! walks that tree at turn time. [`StateMachine::compile`] validates it
//! once at load and flattens it to a per-leaf transition table.

mod machine;
mod state;

pub use machine::{StateMachine, Transition};
pub use state::State;
