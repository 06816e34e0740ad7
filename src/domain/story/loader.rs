//! Story loading: validation, machine compilation and handler binding in
//! one step.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::ConfigurationError;
use crate::domain::handler::{ActionHandler, HandlerRegistry};
use crate::domain::machine::StateMachine;
use crate::domain::validation::StoryValidation;

use super::action::TickAction;
use super::configuration::TickConfiguration;

/// A validated story ready to process turns.
///
/// Holds the authored configuration, its compiled state machine and the
/// resolved handler for every action that declares one. Construction via
/// [`LoadedStory::load`] is the only way to obtain one, so a processor
/// never sees an unvalidated story.
#[derive(Debug, Clone)]
pub struct LoadedStory {
    configuration: TickConfiguration,
    machine: StateMachine,
    bindings: HashMap<String, Arc<ActionHandler>>,
}

impl LoadedStory {
    /// Validates the configuration, compiles its machine and binds every
    /// handler reference to a registered handler.
    ///
    /// All validation problems are reported together through
    /// [`ConfigurationError::InvalidStory`].
    pub fn load(
        configuration: TickConfiguration,
        registry: &HandlerRegistry,
    ) -> Result<Self, ConfigurationError> {
        let errors = StoryValidation::validate(&configuration, registry);
        if !errors.is_empty() {
            return Err(ConfigurationError::InvalidStory {
                story_id: configuration.story_id,
                errors,
            });
        }

        let machine = StateMachine::compile(&configuration.state_machine)?;

        let mut bindings = HashMap::new();
        for action in &configuration.actions {
            if let Some(handler_id) = &action.handler {
                let handler = registry
                    .get(handler_id)
                    .ok_or_else(|| ConfigurationError::unknown_handler(&action.name, handler_id))?;
                bindings.insert(action.name.clone(), Arc::clone(handler));
            }
        }

        Ok(Self {
            configuration,
            machine,
            bindings,
        })
    }

    pub fn story_id(&self) -> &str {
        &self.configuration.story_id
    }

    pub fn configuration(&self) -> &TickConfiguration {
        &self.configuration
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// The action bound to a state, by the name they share.
    pub fn action(&self, name: &str) -> Option<&TickAction> {
        self.configuration.find_action(name)
    }

    /// The resolved handler of an action, if it declares one.
    pub fn handler_for(&self, action: &str) -> Option<&Arc<ActionHandler>> {
        self.bindings.get(action)
    }

    /// How many unknown answers in a row the story tolerates.
    pub fn repetition_limit(&self) -> u32 {
        self.configuration.settings.repetition_limit
    }

    /// Whether executed actions also send context dumps.
    pub fn debug_enabled(&self) -> bool {
        self.configuration.debug
    }
}
