//! The authored shape of one tick story.

use serde::{Deserialize, Serialize};

use crate::domain::machine::State;

use super::action::TickAction;
use super::context::TickContext;
use super::settings::TickStorySettings;

/// Declarative configuration of one tick story.
///
/// Assembled from admin-authored content and immutable once loaded. The
/// loader validates it and compiles the state tree before any turn runs;
/// a `TickConfiguration` that has not been through [`LoadedStory::load`]
/// must not be executed.
///
/// [`LoadedStory::load`]: super::LoadedStory::load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickConfiguration {
    /// Identifier the dialog store keys this story's state under.
    pub story_id: String,

    /// Authored state tree.
    pub state_machine: State,

    /// Declared contexts. Names are unique within the story.
    #[serde(default)]
    pub contexts: Vec<TickContext>,

    /// Declared actions, one per leaf state of the tree.
    #[serde(default)]
    pub actions: Vec<TickAction>,

    #[serde(default)]
    pub settings: TickStorySettings,

    /// When set, every executed action also sends plain-text dumps of its
    /// input and output contexts.
    #[serde(default)]
    pub debug: bool,
}

impl TickConfiguration {
    /// Creates a configuration with default settings and debug off.
    pub fn new<C, A>(
        story_id: impl Into<String>,
        state_machine: State,
        contexts: C,
        actions: A,
    ) -> Self
    where
        C: IntoIterator<Item = TickContext>,
        A: IntoIterator<Item = TickAction>,
    {
        Self {
            story_id: story_id.into(),
            state_machine,
            contexts: contexts.into_iter().collect(),
            actions: actions.into_iter().collect(),
            settings: TickStorySettings::default(),
            debug: false,
        }
    }

    /// Looks up a declared action by name.
    pub fn find_action(&self, name: &str) -> Option<&TickAction> {
        self.actions.iter().find(|action| action.name == name)
    }

    /// Looks up a declared context by name.
    pub fn find_context(&self, name: &str) -> Option<&TickContext> {
        self.contexts.iter().find(|context| context.name == name)
    }

    /// Whether a context name is declared.
    pub fn declares_context(&self, name: &str) -> bool {
        self.find_context(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> TickConfiguration {
        TickConfiguration::new(
            "transfer_limit",
            State::group(
                "root",
                "greet",
                [State::leaf("greet"), State::terminal_leaf("done")],
            ),
            [TickContext::new("CAN_CHANGE_LIMIT")],
            [TickAction::new("greet"), TickAction::new("done")],
        )
    }

    #[test]
    fn find_action_matches_by_name() {
        let config = minimal();
        assert!(config.find_action("greet").is_some());
        assert!(config.find_action("ghost").is_none());
    }

    #[test]
    fn find_context_matches_by_name() {
        let config = minimal();
        assert!(config.declares_context("CAN_CHANGE_LIMIT"));
        assert!(!config.declares_context("GHOST"));
    }

    #[test]
    fn settings_and_debug_default_when_absent() {
        let json = r#"{
            "storyId": "transfer_limit",
            "stateMachine": { "id": "greet", "terminal": true }
        }"#;
        let config: TickConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.settings, TickStorySettings::default());
        assert!(!config.debug);
        assert!(config.contexts.is_empty());
        assert!(config.actions.is_empty());
    }

    #[test]
    fn serde_round_trip_preserves_the_configuration() {
        let config = minimal();
        let json = serde_json::to_string(&config).unwrap();
        let back: TickConfiguration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
