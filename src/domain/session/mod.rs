//! Session module - per-conversation story state.
//!
//! A [`TickSession`] is everything a story remembers between two turns;
//! a [`Dialog`] holds one session per story for a conversation. Both are
//! plain serializable records so callers can persist them wherever they
//! keep conversation state.

mod dialog;
mod session;

pub use dialog::Dialog;
pub use session::{init_tick_session, TickSession, TickState};
