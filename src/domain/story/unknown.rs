//! Unknown-intent fallback policy and its per-session bookkeeping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved intent name matching any unresolved intent.
///
/// A config declaring this intent acts as the wildcard fallback for its
/// action; a config naming a concrete intent only answers that intent.
pub const UNKNOWN_INTENT: &str = "unknown";

fn default_unknown_intent() -> String {
    UNKNOWN_INTENT.to_string()
}

/// Fallback policy for unresolved intents while a given action's question
/// is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownAnswerConfig {
    /// Intent this config answers. Defaults to the reserved wildcard.
    #[serde(default = "default_unknown_intent")]
    pub intent: String,

    /// Action whose pending question this config covers.
    pub action: String,

    /// Action to force when the retry tolerance is exhausted.
    ///
    /// Without one the story gives up and finishes instead of repeating
    /// the fallback forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_action: Option<String>,

    /// Answer payload sent while retries remain.
    pub unknown_answer: String,
}

impl UnknownAnswerConfig {
    /// Returns the composite identity key of this config.
    ///
    /// Two configs with the same intent and action are the same bookkeeping
    /// entry even if their answer payloads differ, so editing the fallback
    /// text does not reset an in-flight retry count.
    pub fn key(&self) -> UnknownHandlingKey {
        UnknownHandlingKey {
            intent: self.intent.clone(),
            action: self.action.clone(),
        }
    }

    /// Whether this config handles the given unresolved intent.
    pub fn applies_to(&self, intent_name: &str) -> bool {
        self.intent == intent_name || self.intent == UNKNOWN_INTENT
    }
}

/// Composite identity key of an [`UnknownAnswerConfig`]: intent plus action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownHandlingKey {
    pub intent: String,
    pub action: String,
}

impl fmt::Display for UnknownHandlingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.intent, self.action)
    }
}

/// Retry tracker for the active unknown-intent episode of a session.
///
/// Holds the config's key rather than the config itself: the answer text
/// and exit action are read from the story at resolution time, so editing
/// them mid-episode takes effect without resetting the count. An immutable
/// value: [`UnknownHandlingStep::increment`] returns a new step rather
/// than mutating in place, so a failed turn can be discarded without
/// unwinding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownHandlingStep {
    /// Consecutive unresolved turns answered by this config, starting at 1.
    pub repeated: u32,

    /// Identity of the config being repeated.
    pub key: UnknownHandlingKey,
}

impl UnknownHandlingStep {
    /// Starts a fresh episode for the config behind the given key.
    pub fn new(key: UnknownHandlingKey) -> Self {
        Self { repeated: 1, key }
    }

    /// Returns a new step with the retry count advanced by one.
    pub fn increment(&self) -> Self {
        Self {
            repeated: self.repeated + 1,
            key: self.key.clone(),
        }
    }

    /// Whether this step tracks the given config.
    pub fn tracks(&self, config: &UnknownAnswerConfig) -> bool {
        self.key == config.key()
    }

    /// Whether the retry count has gone past the configured tolerance.
    pub fn exceeds(&self, repetition_limit: u32) -> bool {
        self.repeated > repetition_limit
    }
}
