//! Sender that logs every operation instead of delivering it.

use crate::ports::TickSender;

/// Default wiring for embedders without a connector yet: every answer is
/// logged at debug level and nothing leaves the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSender;

impl TickSender for TracingSender {
    fn send_by_id(&self, answer_id: &str) {
        tracing::debug!("Sending answer {}", answer_id);
    }

    fn end_by_id(&self, answer_id: &str) {
        tracing::debug!("Sending final answer {}", answer_id);
    }

    fn send_plain_text(&self, text: &str) {
        tracing::debug!("Sending text: {}", text);
    }

    fn end_plain_text(&self, text: &str) {
        tracing::debug!("Sending final text: {}", text);
    }

    fn end(&self) {
        tracing::debug!("Closing the turn without an answer");
    }
}
