//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to the outside:
//! - `sender` - Where answers go (recording double, tracing default)
//! - `handlers` - How handlers reach the registry at load time
//! - `story` - Where authored stories come from (JSON/YAML files)

pub mod handlers;
pub mod sender;
pub mod story;

pub use handlers::StaticHandlersProvider;
pub use sender::{RecordingSender, SentEntry, TracingSender};
pub use story::FileStorySource;
