//! Per-story session state and its turn-start initialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::story::{ContextMap, UnknownHandlingStep};

use super::dialog::Dialog;

/// Serializable state of one story within one conversation.
///
/// Everything the engine knows between two turns lives here; the
/// processor takes a session in, returns a new one out, and the caller
/// persists it. No other state survives a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickSession {
    /// Machine state the story is waiting in. `None` until the first
    /// transition resolves, meaning the machine's entry state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<String>,

    /// Accumulated context values.
    #[serde(default)]
    pub contexts: ContextMap,

    /// Names of the actions executed so far, in execution order.
    #[serde(default)]
    pub ran_handlers: Vec<String>,

    /// States the user asked for that the story has not settled on yet.
    #[serde(default)]
    pub objectives_stack: Vec<String>,

    /// In-flight unknown-intent retry, if the last turn sent a fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_handling_step: Option<UnknownHandlingStep>,

    /// When this run of the story started.
    pub init_date: DateTime<Utc>,

    /// Whether the story reached a terminal state. A finished session is
    /// never resumed; the next turn starts fresh.
    #[serde(default)]
    pub finished: bool,
}

/// The persisted form of a session, as stored under a dialog.
pub type TickState = TickSession;

impl TickSession {
    /// Creates an empty session starting now.
    pub fn new() -> Self {
        Self {
            current_state: None,
            contexts: ContextMap::new(),
            ran_handlers: Vec::new(),
            objectives_stack: Vec::new(),
            unknown_handling_step: None,
            init_date: Utc::now(),
            finished: false,
        }
    }
}

impl Default for TickSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the session a turn runs against.
///
/// A story the dialog has no state for, or whose previous run finished,
/// starts fresh, dated from the dialog's last update. Otherwise the
/// stored state is resumed. Either way the caller-supplied conversation
/// data is merged into the contexts with stored values taking
/// precedence, so upstream data never overwrites what the story has
/// already established.
pub fn init_tick_session(
    dialog: &Dialog,
    story_id: &str,
    conversation_data: &HashMap<String, String>,
) -> TickSession {
    let mut session = match dialog.tick_state(story_id) {
        Some(stored) if !stored.finished => stored.clone(),
        _ => {
            let mut fresh = TickSession::new();
            fresh.init_date = dialog.last_update_time;
            fresh
        }
    };
    for (key, value) in conversation_data {
        session
            .contexts
            .entry(key.clone())
            .or_insert_with(|| Some(value.clone()));
    }
    session
}
