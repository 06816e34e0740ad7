//! Domain layer containing the engine's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, errors)
//! - `story` - The authored story model and its loader
//! - `machine` - Declarative state tree and its compiled transition table
//! - `handler` - Action handlers and their registry
//! - `session` - Per-conversation story state
//! - `processor` - One user turn against one loaded story
//! - `validation` - Load-time story validation

pub mod foundation;
pub mod handler;
pub mod machine;
pub mod processor;
pub mod session;
pub mod story;
pub mod validation;
