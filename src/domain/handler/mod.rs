//! Handler module - the pluggable business functions of stories.

mod action_handler;
mod registry;

pub use action_handler::{ActionHandler, HandlerResult};
pub use registry::HandlerRegistry;
