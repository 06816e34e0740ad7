//! Story validation: every cross-reference of an authored story checked
//! before it may serve traffic.
//!
//! Rules are collected into a list of human-readable problems rather than
//! failing on the first, so an author fixing a story sees everything
//! wrong with it at once. Structural problems inside the state tree
//! (duplicates, dangling targets, missing initials, self transitions)
//! are reported through the same list via [`StateMachine::compile`].

use std::collections::BTreeSet;

use crate::domain::handler::HandlerRegistry;
use crate::domain::machine::StateMachine;
use crate::domain::story::TickConfiguration;

/// Load-time validation over a [`TickConfiguration`].
pub struct StoryValidation;

impl StoryValidation {
    /// Runs every rule and returns all problems found, empty when the
    /// story is sound.
    pub fn validate(configuration: &TickConfiguration, registry: &HandlerRegistry) -> Vec<String> {
        let mut errors = Vec::new();

        errors.extend(Self::validate_names(configuration));
        errors.extend(Self::validate_action_handlers(configuration, registry));
        errors.extend(Self::validate_handler_contracts(configuration, registry));
        errors.extend(Self::validate_declared_contexts(configuration));
        errors.extend(Self::validate_context_closure(configuration));
        errors.extend(Self::validate_unknown_configs(configuration));

        match StateMachine::compile(&configuration.state_machine) {
            Ok(machine) => {
                errors.extend(Self::validate_states(configuration, &machine));
                errors.extend(Self::validate_actions(configuration, &machine));
            }
            Err(structural) => errors.push(structural.to_string()),
        }

        errors
    }

    /// Duplicate context/action names and collisions between the two.
    fn validate_names(configuration: &TickConfiguration) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen_contexts = BTreeSet::new();
        for context in &configuration.contexts {
            if !seen_contexts.insert(context.name.as_str()) {
                errors.push(format!(
                    "Context '{}' is declared more than once",
                    context.name
                ));
            }
        }
        let mut seen_actions = BTreeSet::new();
        for action in &configuration.actions {
            if !seen_actions.insert(action.name.as_str()) {
                errors.push(format!("Action '{}' is declared more than once", action.name));
            }
        }
        for context in &configuration.contexts {
            if seen_actions.contains(context.name.as_str()) {
                errors.push(format!(
                    "Context '{}' conflicts with an action of the same name",
                    context.name
                ));
            }
        }
        errors
    }

    /// Every machine leaf must have an action of the same name.
    fn validate_states(configuration: &TickConfiguration, machine: &StateMachine) -> Vec<String> {
        machine
            .leaf_states()
            .filter(|leaf| configuration.find_action(leaf).is_none())
            .map(|leaf| format!("State machine state '{leaf}' has no action of the same name"))
            .collect()
    }

    /// Every action must be a machine leaf.
    fn validate_actions(configuration: &TickConfiguration, machine: &StateMachine) -> Vec<String> {
        configuration
            .actions
            .iter()
            .filter(|action| !machine.contains_state(&action.name))
            .map(|action| format!("Action '{}' is not a state machine state", action.name))
            .collect()
    }

    /// Every handler reference must resolve in the registry.
    fn validate_action_handlers(
        configuration: &TickConfiguration,
        registry: &HandlerRegistry,
    ) -> Vec<String> {
        configuration
            .actions
            .iter()
            .filter_map(|action| action.handler.as_deref().map(|handler| (action, handler)))
            .filter(|(_, handler)| !registry.contains(handler))
            .map(|(action, handler)| {
                format!(
                    "Action '{}' references handler '{handler}' which is not registered",
                    action.name
                )
            })
            .collect()
    }

    /// An action's declared contexts must match its handler's contract,
    /// or the load-time chaining decisions and the runtime checks would
    /// disagree.
    fn validate_handler_contracts(
        configuration: &TickConfiguration,
        registry: &HandlerRegistry,
    ) -> Vec<String> {
        let mut errors = Vec::new();
        for action in &configuration.actions {
            let Some(handler_id) = action.handler.as_deref() else {
                continue;
            };
            let Some(handler) = registry.get(handler_id) else {
                continue;
            };
            if handler.input_contexts() != &action.input_context_names {
                errors.push(format!(
                    "Action '{}' declares input contexts {:?} but handler '{handler_id}' declares {:?}",
                    action.name, action.input_context_names, handler.input_contexts()
                ));
            }
            if handler.output_contexts() != &action.output_context_names {
                errors.push(format!(
                    "Action '{}' declares output contexts {:?} but handler '{handler_id}' declares {:?}",
                    action.name, action.output_context_names, handler.output_contexts()
                ));
            }
        }
        errors
    }

    /// Contexts used by actions must be declared, and declared contexts
    /// must be used.
    fn validate_declared_contexts(configuration: &TickConfiguration) -> Vec<String> {
        let mut errors = Vec::new();
        for action in &configuration.actions {
            for used in action
                .input_context_names
                .iter()
                .chain(&action.output_context_names)
            {
                if !configuration.declares_context(used) {
                    errors.push(format!(
                        "Context '{used}' used by action '{}' is not declared",
                        action.name
                    ));
                }
            }
        }
        for context in &configuration.contexts {
            let used = configuration.actions.iter().any(|action| {
                action.input_context_names.contains(&context.name)
                    || action.output_context_names.contains(&context.name)
            });
            if !used {
                errors.push(format!(
                    "Declared context '{}' is never used by an action",
                    context.name
                ));
            }
        }
        errors
    }

    /// Inputs must be produced somewhere (or fed by an entity); outputs
    /// must be consumed somewhere.
    fn validate_context_closure(configuration: &TickConfiguration) -> Vec<String> {
        let mut errors = Vec::new();
        for action in &configuration.actions {
            for input in &action.input_context_names {
                let produced = configuration
                    .actions
                    .iter()
                    .any(|other| other.output_context_names.contains(input));
                let entity_fed = configuration
                    .find_context(input)
                    .is_some_and(|context| context.entity_role.is_some());
                if !produced && !entity_fed {
                    errors.push(format!(
                        "Input context '{input}' of action '{}' is produced by no action and fed by no entity",
                        action.name
                    ));
                }
            }
            for output in &action.output_context_names {
                let consumed = configuration
                    .actions
                    .iter()
                    .any(|other| other.input_context_names.contains(output));
                if !consumed {
                    errors.push(format!(
                        "Output context '{output}' of action '{}' is consumed by no action",
                        action.name
                    ));
                }
            }
        }
        errors
    }

    /// Unknown-answer configs must agree with the action they are
    /// attached to and exit to a declared action.
    fn validate_unknown_configs(configuration: &TickConfiguration) -> Vec<String> {
        let mut errors = Vec::new();
        for action in &configuration.actions {
            let Some(config) = &action.unknown_answer_config else {
                continue;
            };
            if config.action != action.name {
                errors.push(format!(
                    "Unknown answer config attached to action '{}' names action '{}'",
                    action.name, config.action
                ));
            }
            if let Some(exit_action) = &config.exit_action {
                if configuration.find_action(exit_action).is_none() {
                    errors.push(format!(
                        "Unknown answer config of action '{}' exits to undeclared action '{exit_action}'",
                        action.name
                    ));
                }
            }
        }
        errors
    }
}
