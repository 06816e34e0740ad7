//! Compiled transition table of a story's state tree.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::foundation::ConfigurationError;

use super::state::{target_id, State};

/// One flattened transition out of a leaf state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Intent that fires this transition.
    pub intent: String,

    /// Leaf state entered. Group targets are already descended through
    /// their `initial` children.
    pub target: String,
}

/// Transition table compiled once at load time from the authored tree.
///
/// Nesting is resolved away before any turn runs: each leaf carries its
/// own transitions first, then those inherited from enclosing groups
/// (nearest first), an intent declared closer to the leaf shadowing outer
/// declarations. Intents declared near the root thereby act as global
/// interrupts reachable from every state that does not override them.
#[derive(Debug, Clone)]
pub struct StateMachine {
    initial: String,
    transitions: BTreeMap<String, Vec<Transition>>,
    terminal: BTreeSet<String>,
}

impl StateMachine {
    /// Compiles the authored tree, rejecting inconsistencies that must
    /// never surface at turn time: duplicate state ids, dangling
    /// transition targets, groups without a resolvable initial child,
    /// transitions from a state directly back onto itself, and machines
    /// with no terminal leaf.
    pub fn compile(root: &State) -> Result<Self, ConfigurationError> {
        let index = NodeIndex::build(root)?;
        let initial = index.descend_initial(root)?;

        let mut transitions = BTreeMap::new();
        let mut terminal = BTreeSet::new();
        for leaf in index.leaves() {
            transitions.insert(leaf.id.clone(), index.flatten(leaf)?);
            if leaf.terminal {
                terminal.insert(leaf.id.clone());
            }
        }
        if terminal.is_empty() {
            return Err(ConfigurationError::NoTerminalState);
        }

        Ok(Self {
            initial,
            transitions,
            terminal,
        })
    }

    /// The leaf entered when a fresh session takes its first turn.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// Resolves the transition fired by `intent` from `state`, if any.
    pub fn transition(&self, state: &str, intent: &str) -> Option<&str> {
        self.transitions
            .get(state)?
            .iter()
            .find(|transition| transition.intent == intent)
            .map(|transition| transition.target.as_str())
    }

    /// All transitions out of `state`, own declarations before inherited
    /// ones. Empty for unknown states.
    pub fn transitions_from(&self, state: &str) -> &[Transition] {
        self.transitions
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether reaching `state` finishes the story.
    pub fn is_terminal(&self, state: &str) -> bool {
        self.terminal.contains(state)
    }

    /// Whether `state` is a leaf of this machine.
    pub fn contains_state(&self, state: &str) -> bool {
        self.transitions.contains_key(state)
    }

    /// The leaf state ids, sorted.
    pub fn leaf_states(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }
}

/// Parent-pointer index over the authored tree, used only during
/// compilation.
struct NodeIndex<'a> {
    nodes: HashMap<&'a str, &'a State>,
    parents: HashMap<&'a str, &'a State>,
}

impl<'a> NodeIndex<'a> {
    fn build(root: &'a State) -> Result<Self, ConfigurationError> {
        let mut index = Self {
            nodes: HashMap::new(),
            parents: HashMap::new(),
        };
        index.insert_subtree(root, None)?;
        Ok(index)
    }

    fn insert_subtree(
        &mut self,
        node: &'a State,
        parent: Option<&'a State>,
    ) -> Result<(), ConfigurationError> {
        if self.nodes.insert(node.id.as_str(), node).is_some() {
            return Err(ConfigurationError::DuplicateState {
                id: node.id.clone(),
            });
        }
        if let Some(parent) = parent {
            self.parents.insert(node.id.as_str(), parent);
        }
        for child in node.children() {
            self.insert_subtree(child, Some(node))?;
        }
        Ok(())
    }

    /// Descends a node through `initial` children until a leaf.
    fn descend_initial(&self, node: &'a State) -> Result<String, ConfigurationError> {
        let mut current = node;
        while current.is_group() {
            let next = current.initial.as_deref().and_then(|initial_id| {
                current
                    .children()
                    .find(|child| child.id == target_id(initial_id))
            });
            match next {
                Some(child) => current = child,
                None => {
                    return Err(ConfigurationError::MissingInitialState {
                        id: current.id.clone(),
                    })
                }
            }
        }
        Ok(current.id.clone())
    }

    /// The leaf nodes, sorted by id for deterministic compilation.
    fn leaves(&self) -> Vec<&'a State> {
        let mut leaves: Vec<&'a State> = self
            .nodes
            .values()
            .filter(|node| !node.is_group())
            .copied()
            .collect();
        leaves.sort_by_key(|node| node.id.as_str());
        leaves
    }

    /// Builds the effective transition rows of one leaf by climbing its
    /// ancestor chain. Every declared transition on the chain is resolved
    /// even when shadowed, so a dangling target fails compilation no
    /// matter which leaf it is observed from.
    fn flatten(&self, leaf: &'a State) -> Result<Vec<Transition>, ConfigurationError> {
        let mut rows = Vec::new();
        let mut claimed: BTreeSet<&str> = BTreeSet::new();
        let mut node = Some(leaf);
        while let Some(current) = node {
            for (intent, reference) in current.declared_transitions() {
                let target = self.resolve(current, intent, reference)?;
                if claimed.insert(intent) {
                    rows.push(Transition {
                        intent: intent.to_string(),
                        target,
                    });
                }
            }
            node = self.parents.get(current.id.as_str()).copied();
        }
        Ok(rows)
    }

    /// Resolves one declared transition to its target leaf.
    fn resolve(
        &self,
        declaring: &State,
        intent: &str,
        reference: &str,
    ) -> Result<String, ConfigurationError> {
        let target = target_id(reference);
        let target_node = self.nodes.get(target).copied().ok_or_else(|| {
            ConfigurationError::DanglingTransitionTarget {
                from: declaring.id.clone(),
                intent: intent.to_string(),
                target: target.to_string(),
            }
        })?;
        if target == declaring.id {
            return Err(ConfigurationError::SelfTransition {
                state: declaring.id.clone(),
                intent: intent.to_string(),
            });
        }
        self.descend_initial(target_node)
    }
}
