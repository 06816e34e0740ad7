//! The NLU result a turn is processed against.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One recognized user utterance: an intent plus its extracted entities.
///
/// Entities are keyed by role; a story context declaring that role as its
/// `entity_role` captures the value at the start of the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickUserAction {
    /// Recognized intent name.
    pub intent_name: String,

    /// Extracted entity values, keyed by role.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub entities: HashMap<String, String>,
}

impl TickUserAction {
    /// Creates a user action with no entities.
    pub fn new(intent_name: impl Into<String>) -> Self {
        Self {
            intent_name: intent_name.into(),
            entities: HashMap::new(),
        }
    }

    /// Adds an extracted entity.
    pub fn with_entity(mut self, role: impl Into<String>, value: impl Into<String>) -> Self {
        self.entities.insert(role.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_entities_by_role() {
        let action = TickUserAction::new("check_transfer")
            .with_entity("amount", "2000")
            .with_entity("currency", "EUR");

        assert_eq!(action.intent_name, "check_transfer");
        assert_eq!(action.entities.get("amount").map(String::as_str), Some("2000"));
        assert_eq!(action.entities.len(), 2);
    }

    #[test]
    fn entities_are_omitted_from_json_when_empty() {
        let json = serde_json::to_string(&TickUserAction::new("greet")).unwrap();
        assert_eq!(json, r#"{"intentName":"greet"}"#);
    }
}
