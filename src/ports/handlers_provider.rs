//! Load-time discovery of action handlers.

use crate::domain::handler::ActionHandler;

/// Supplies a namespaced set of action handlers at startup.
///
/// Providers are discovered once when the embedding bot boots and drained
/// into a [`HandlerRegistry`]; the engine never calls back into a provider
/// at turn time.
///
/// [`HandlerRegistry`]: crate::domain::handler::HandlerRegistry
pub trait ActionHandlersProvider {
    /// Namespace this provider's handlers belong to.
    fn namespace(&self) -> &str;

    /// The handlers contributed by this provider.
    fn action_handlers(&self) -> Vec<ActionHandler>;
}
