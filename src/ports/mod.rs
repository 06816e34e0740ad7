//! Ports - Interfaces to the engine's external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TickSender` - outbound messages, rendered by the connector layer
//! - `ActionHandlersProvider` - startup-time discovery of business handlers

mod handlers_provider;
mod sender;

pub use handlers_provider::ActionHandlersProvider;
pub use sender::TickSender;
