//! Processor module - one user turn against one loaded story.

mod processor;
mod user_action;

pub use processor::{ProcessedTurn, TickStoryProcessor};
pub use user_action::TickUserAction;
