//! Story module - the authored model of a tick story and its loader.
//!
//! A story is configuration, not code: contexts, actions, an unknown
//! answer policy and a state tree, bound together by name. [`LoadedStory`]
//! is the validated, executable form the processor works against.

mod action;
mod configuration;
mod context;
mod loader;
mod settings;
mod unknown;

pub use action::TickAction;
pub use configuration::TickConfiguration;
pub use context::{ContextMap, TickContext};
pub use loader::LoadedStory;
pub use settings::{TickStorySettings, DEFAULT_REPETITION_LIMIT};
pub use unknown::{
    UnknownAnswerConfig, UnknownHandlingKey, UnknownHandlingStep, UNKNOWN_INTENT,
};
