//! Error types for the engine.
//!
//! Three families, matching where they can surface:
//!
//! - [`ConfigurationError`] is raised while loading a story and aborts
//!   startup. It never crosses a per-turn boundary.
//! - [`InvocationError`] is raised while invoking an action handler, either
//!   because the handler broke its declared context contract or because its
//!   business logic failed.
//! - [`ProcessingError`] is the per-turn umbrella the processor's caller
//!   sees. A turn that errors is discarded wholesale.

use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors raised while loading or validating a story configuration.
///
/// Fatal by design: a story that fails to load must never serve traffic,
/// so these abort startup instead of degrading per turn.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Handler '{id}' is already registered under namespace '{namespace}'")]
    DuplicateHandler { id: String, namespace: String },

    #[error("Duplicate state id '{id}' in state machine")]
    DuplicateState { id: String },

    #[error("Transition on '{intent}' from state '{from}' targets unknown state '{target}'")]
    DanglingTransitionTarget {
        from: String,
        intent: String,
        target: String,
    },

    #[error("Group state '{id}' has no resolvable initial child")]
    MissingInitialState { id: String },

    #[error("Transition on '{intent}' loops state '{state}' back onto itself")]
    SelfTransition { state: String, intent: String },

    #[error("State machine declares no terminal state")]
    NoTerminalState,

    #[error("Action '{action}' references handler '{handler}' which is not registered")]
    UnknownHandler { action: String, handler: String },

    #[error("Story '{story_id}' failed validation: {}", errors.join("; "))]
    InvalidStory {
        story_id: String,
        errors: Vec<String>,
    },

    #[error("Unable to read story from '{path}': {reason}")]
    UnreadableStory { path: String, reason: String },
}

impl ConfigurationError {
    /// Creates a duplicate handler registration error.
    pub fn duplicate_handler(id: impl Into<String>, namespace: impl Into<String>) -> Self {
        ConfigurationError::DuplicateHandler {
            id: id.into(),
            namespace: namespace.into(),
        }
    }

    /// Creates an unknown handler reference error.
    pub fn unknown_handler(action: impl Into<String>, handler: impl Into<String>) -> Self {
        ConfigurationError::UnknownHandler {
            action: action.into(),
            handler: handler.into(),
        }
    }

    /// Creates an unreadable story error.
    pub fn unreadable_story(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigurationError::UnreadableStory {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Stable machine-readable codes for handler contract violations.
///
/// These codes are part of the handler contract and must stay stable
/// across releases so embedders can match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractViolation {
    InputContextNotProvided,
    OutputContextNotDeclared,
    NoOutputContextComputed,
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContractViolation::InputContextNotProvided => "ERR_INPUT_CONTEXT_NOT_PROVIDED",
            ContractViolation::OutputContextNotDeclared => "ERR_OUTPUT_CONTEXT_NOT_DECLARED",
            ContractViolation::NoOutputContextComputed => "ERR_NO_OUTPUT_CONTEXT_COMPUTED",
        };
        write!(f, "{}", s)
    }
}

/// Errors raised when invoking an action handler.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("{code}: handler '{handler}' is missing input contexts {missing:?}",
        code = ContractViolation::InputContextNotProvided)]
    InputContextNotProvided {
        handler: String,
        /// Exactly the declared inputs that were absent, sorted.
        missing: Vec<String>,
    },

    #[error("{code}: handler '{handler}' produced undeclared output contexts {undeclared:?}",
        code = ContractViolation::OutputContextNotDeclared)]
    OutputContextNotDeclared {
        handler: String,
        undeclared: Vec<String>,
    },

    #[error("{code}: handler '{handler}' declares output contexts but computed none",
        code = ContractViolation::NoOutputContextComputed)]
    NoOutputContextComputed { handler: String },

    #[error("Handler '{handler}' is not registered")]
    HandlerNotFound { handler: String },

    #[error("Handler '{handler}' failed: {source}")]
    HandlerFailed {
        handler: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl InvocationError {
    /// Returns the stable contract-violation code, if this error is one.
    ///
    /// `HandlerNotFound` and `HandlerFailed` are not contract violations
    /// and return `None`.
    pub fn contract_violation(&self) -> Option<ContractViolation> {
        match self {
            InvocationError::InputContextNotProvided { .. } => {
                Some(ContractViolation::InputContextNotProvided)
            }
            InvocationError::OutputContextNotDeclared { .. } => {
                Some(ContractViolation::OutputContextNotDeclared)
            }
            InvocationError::NoOutputContextComputed { .. } => {
                Some(ContractViolation::NoOutputContextComputed)
            }
            InvocationError::HandlerNotFound { .. } | InvocationError::HandlerFailed { .. } => None,
        }
    }
}

/// Errors that abort a conversational turn.
///
/// When one of these surfaces, the turn's session mutation is discarded
/// and nothing queued for sending is delivered.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("Session references state '{state}' which is not in the state machine")]
    UnknownSessionState { state: String },

    #[error("State '{state}' has no action bound to it")]
    UnboundState { state: String },
}
