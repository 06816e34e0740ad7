//! Story actions: the business steps bound to state machine states.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::context::ContextMap;
use super::unknown::UnknownAnswerConfig;

/// A unit of business work bound to a state of the story's machine.
///
/// The binding is by name: every non-group state of the machine has
/// exactly one action with the same name. An action without an answer is
/// *silent*: it computes contexts but says nothing to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickAction {
    /// Action name, equal to the id of the state it is bound to.
    pub name: String,

    /// Registered handler executed when the state is entered, if any.
    /// Actions without a handler only carry an answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    /// Answer payload sent when the state is entered, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<String>,

    /// Contexts the handler requires. Checked before invocation.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub input_context_names: BTreeSet<String>,

    /// Contexts the handler may produce. Checked after invocation.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub output_context_names: BTreeSet<String>,

    /// Fallback policy while this action's question is pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_answer_config: Option<UnknownAnswerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TickAction {
    /// Creates an action with no handler, no answer and no contexts.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler: None,
            answer_id: None,
            input_context_names: BTreeSet::new(),
            output_context_names: BTreeSet::new(),
            unknown_answer_config: None,
            description: None,
        }
    }

    /// Sets the handler reference.
    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    /// Sets the answer payload.
    pub fn with_answer(mut self, answer_id: impl Into<String>) -> Self {
        self.answer_id = Some(answer_id.into());
        self
    }

    /// Declares the input contexts.
    pub fn with_inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_context_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Declares the output contexts.
    pub fn with_outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_context_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches an unknown-intent fallback policy.
    pub fn with_unknown_answer(mut self, config: UnknownAnswerConfig) -> Self {
        self.unknown_answer_config = Some(config);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this action says nothing to the user.
    pub fn is_silent(&self) -> bool {
        self.answer_id.is_none()
    }

    /// Whether this action can run without waiting for user input.
    ///
    /// True iff it declares at least one input context and all of them are
    /// already present. An action with no declared inputs never qualifies:
    /// nothing marks it as a system-only step, so it waits for a user turn.
    pub fn inputs_satisfied_by(&self, contexts: &ContextMap) -> bool {
        !self.input_context_names.is_empty()
            && self
                .input_context_names
                .iter()
                .all(|name| contexts.contains_key(name))
    }
}
