//! Central registry of action handlers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::{ConfigurationError, InvocationError};
use crate::domain::story::ContextMap;
use crate::ports::ActionHandlersProvider;

use super::action_handler::ActionHandler;

/// Registry mapping handler ids to business functions.
///
/// An explicit value handed to the story loader, never a process-wide
/// singleton: each test or tenant builds its own. It is populated once at
/// startup and read-only afterwards. Handler ids are unique across all
/// namespaces; registering an id twice is a fatal startup error
/// regardless of which function is being registered.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<ActionHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Builds a registry from load-time providers, in order.
    ///
    /// Fails on the first duplicate id, including duplicates across two
    /// providers.
    pub fn from_providers(
        providers: &[&dyn ActionHandlersProvider],
    ) -> Result<Self, ConfigurationError> {
        let mut registry = Self::new();
        for provider in providers {
            for handler in provider.action_handlers() {
                registry.register(handler)?;
            }
        }
        Ok(registry)
    }

    /// Registers a handler under its id.
    pub fn register(&mut self, handler: ActionHandler) -> Result<(), ConfigurationError> {
        if let Some(existing) = self.handlers.get(handler.id()) {
            return Err(ConfigurationError::duplicate_handler(
                handler.id(),
                existing.namespace(),
            ));
        }
        self.handlers
            .insert(handler.id().to_string(), Arc::new(handler));
        Ok(())
    }

    /// Looks up a handler by id.
    pub fn get(&self, id: &str) -> Option<&Arc<ActionHandler>> {
        self.handlers.get(id)
    }

    /// Whether a handler id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Invokes a handler by id under its declared contract.
    pub fn invoke(&self, id: &str, provided: &ContextMap) -> Result<ContextMap, InvocationError> {
        match self.handlers.get(id) {
            Some(handler) => handler.invoke(provided),
            None => Err(InvocationError::HandlerNotFound {
                handler: id.to_string(),
            }),
        }
    }
}
