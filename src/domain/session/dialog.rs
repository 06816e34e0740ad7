//! The dialog record holding per-story session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::DialogId;

use super::session::TickState;

/// One conversation with a user, as the engine sees it.
///
/// Carries the persisted state of every story the conversation has
/// touched, keyed by story id. Storage of the record itself is the
/// caller's concern; the engine only reads and updates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialog {
    /// Unique identifier of this conversation.
    pub id: DialogId,

    /// When a story state was last recorded.
    pub last_update_time: DateTime<Utc>,

    /// Persisted session per story id.
    #[serde(default)]
    pub tick_states: HashMap<String, TickState>,
}

impl Dialog {
    /// Creates an empty dialog updated now.
    pub fn new(id: DialogId) -> Self {
        Self {
            id,
            last_update_time: Utc::now(),
            tick_states: HashMap::new(),
        }
    }

    /// The stored state of a story, if it ever ran in this dialog.
    pub fn tick_state(&self, story_id: &str) -> Option<&TickState> {
        self.tick_states.get(story_id)
    }

    /// Records a story's state after a turn and bumps the update time.
    pub fn record_tick_state(&mut self, story_id: impl Into<String>, state: TickState) {
        self.tick_states.insert(story_id.into(), state);
        self.last_update_time = Utc::now();
    }
}
