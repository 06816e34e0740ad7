//! Tick Engine - Declarative Dialog Orchestration
//!
//! This crate drives scripted conversations through per-story state
//! machines: authored configurations bind machine states to business
//! action handlers, sessions carry the conversation state between turns,
//! and a processor resolves each recognized intent into transitions,
//! handler invocations and answers.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
