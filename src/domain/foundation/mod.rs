//! Foundation module - Shared domain primitives.
//!
//! Contains the identifier and error types that form the vocabulary
//! of the engine.

mod errors;
mod ids;

pub use errors::{ConfigurationError, ContractViolation, InvocationError, ProcessingError};
pub use ids::DialogId;
