//! Handler provider over a fixed, in-process handler set.

use crate::domain::handler::ActionHandler;
use crate::ports::ActionHandlersProvider;

/// Provider wrapping handlers built directly in code.
///
/// The simplest way to contribute handlers at load time: embedders build
/// one per namespace and hand the set to
/// [`HandlerRegistry::from_providers`].
///
/// [`HandlerRegistry::from_providers`]: crate::domain::handler::HandlerRegistry::from_providers
#[derive(Debug, Clone)]
pub struct StaticHandlersProvider {
    namespace: String,
    handlers: Vec<ActionHandler>,
}

impl StaticHandlersProvider {
    /// Creates an empty provider for one namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            handlers: Vec::new(),
        }
    }

    /// Adds a handler to the provided set.
    pub fn with_handler(mut self, handler: ActionHandler) -> Self {
        self.handlers.push(handler);
        self
    }
}

impl ActionHandlersProvider for StaticHandlersProvider {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn action_handlers(&self) -> Vec<ActionHandler> {
        self.handlers.clone()
    }
}
