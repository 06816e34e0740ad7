//! Declarative state tree of a story.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn is_false(value: &bool) -> bool {
    !*value
}

/// A node of the authored state tree.
///
/// A node with children is a *group*: it never executes itself, it scopes
/// transitions for its descendants and designates the `initial` child
/// entered when the group is targeted. A node without children is a leaf,
/// bound by name to exactly one action.
///
/// Transition targets are written as `#StateId` references; the leading
/// `#` is tolerated but not required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub id: String,

    /// Child entered when this group is targeted by a transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,

    /// Child states keyed by id. Sorted map so compilation is
    /// deterministic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<BTreeMap<String, State>>,

    /// Transitions declared on this node: intent name to target reference.
    /// Descendants inherit them unless they declare the same intent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<BTreeMap<String, String>>,

    /// Whether reaching this leaf finishes the story.
    #[serde(default, skip_serializing_if = "is_false")]
    pub terminal: bool,
}

impl State {
    /// Creates a leaf state.
    pub fn leaf(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            initial: None,
            states: None,
            on: None,
            terminal: false,
        }
    }

    /// Creates a terminal leaf state.
    pub fn terminal_leaf(id: impl Into<String>) -> Self {
        Self {
            terminal: true,
            ..Self::leaf(id)
        }
    }

    /// Creates a group state with the given initial child.
    pub fn group<I>(id: impl Into<String>, initial: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = State>,
    {
        Self {
            id: id.into(),
            initial: Some(initial.into()),
            states: Some(
                children
                    .into_iter()
                    .map(|child| (child.id.clone(), child))
                    .collect(),
            ),
            on: None,
            terminal: false,
        }
    }

    /// Adds a transition declared on this node.
    pub fn with_transition(mut self, intent: impl Into<String>, target: impl Into<String>) -> Self {
        self.on
            .get_or_insert_with(BTreeMap::new)
            .insert(intent.into(), target.into());
        self
    }

    /// Whether this node has child states.
    pub fn is_group(&self) -> bool {
        self.states.as_ref().is_some_and(|children| !children.is_empty())
    }

    /// The children of this node, empty for leaves.
    pub(crate) fn children(&self) -> impl Iterator<Item = &State> {
        self.states.iter().flat_map(|children| children.values())
    }

    /// The transitions declared on this node, empty when none.
    pub(crate) fn declared_transitions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.on
            .iter()
            .flat_map(|on| on.iter())
            .map(|(intent, target)| (intent.as_str(), target.as_str()))
    }
}

/// Strips the `#` reference prefix from a transition target.
pub(crate) fn target_id(reference: &str) -> &str {
    reference.strip_prefix('#').unwrap_or(reference)
}
