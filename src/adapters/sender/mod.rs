//! Sender adapters: where a story's answers go.

mod recording;
mod tracing_sender;

pub use recording::{RecordingSender, SentEntry};
pub use tracing_sender::TracingSender;
