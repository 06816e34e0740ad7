//! Conversation contexts: the named data slots a story reads and writes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Context values held by a session at a point in time.
///
/// A key may map to `None`: presence alone is enough to satisfy a handler
/// input or an automatic transition, so a context can act as a flag.
pub type ContextMap = HashMap<String, Option<String>>;

/// A context declared by a story configuration.
///
/// Context names are unique within a configuration; the loader rejects
/// duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickContext {
    /// Name under which handlers and transitions see this context.
    pub name: String,

    /// NLU entity role feeding this context, if any.
    ///
    /// When a user turn carries an entity with this role, the entity value
    /// is copied into the context before the transition is resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_role: Option<String>,
}

impl TickContext {
    /// Creates a context with no entity binding.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_role: None,
        }
    }

    /// Creates a context fed by an NLU entity role.
    pub fn with_entity_role(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_role: Some(role.into()),
        }
    }
}
