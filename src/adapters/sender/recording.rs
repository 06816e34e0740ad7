//! Recording sender for testing.
//!
//! Captures every sender operation in call order so tests can assert on
//! the exact answer sequence a turn produced.

use std::sync::Mutex;

use crate::ports::TickSender;

/// One captured sender operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentEntry {
    SendById(String),
    EndById(String),
    SendPlainText(String),
    EndPlainText(String),
    End,
}

/// Sender that records instead of delivering.
///
/// The history is only exposed as a cloned snapshot, so an assertion
/// taken at one point is not retroactively changed by later sends.
/// Methods panic if the internal lock is poisoned, which is acceptable
/// for test code.
#[derive(Debug)]
pub struct RecordingSender {
    history: Mutex<Vec<SentEntry>>,
}

impl RecordingSender {
    /// Creates a sender with an empty history.
    pub fn new() -> Self {
        Self {
            history: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything sent so far, in call order.
    pub fn history(&self) -> Vec<SentEntry> {
        self.history
            .lock()
            .expect("RecordingSender: history lock poisoned")
            .clone()
    }

    /// Number of operations recorded.
    pub fn sent_count(&self) -> usize {
        self.history
            .lock()
            .expect("RecordingSender: history lock poisoned")
            .len()
    }

    /// Drops the recorded history, for test isolation.
    pub fn clear(&self) {
        self.history
            .lock()
            .expect("RecordingSender: history lock poisoned")
            .clear();
    }

    fn record(&self, entry: SentEntry) {
        self.history
            .lock()
            .expect("RecordingSender: history lock poisoned")
            .push(entry);
    }
}

impl Default for RecordingSender {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSender for RecordingSender {
    fn send_by_id(&self, answer_id: &str) {
        self.record(SentEntry::SendById(answer_id.to_string()));
    }

    fn end_by_id(&self, answer_id: &str) {
        self.record(SentEntry::EndById(answer_id.to_string()));
    }

    fn send_plain_text(&self, text: &str) {
        self.record(SentEntry::SendPlainText(text.to_string()));
    }

    fn end_plain_text(&self, text: &str) {
        self.record(SentEntry::EndPlainText(text.to_string()));
    }

    fn end(&self) {
        self.record(SentEntry::End);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_are_recorded_in_call_order() {
        let sender = RecordingSender::new();
        sender.send_by_id("first");
        sender.send_plain_text("second");
        sender.end_by_id("third");

        assert_eq!(
            sender.history(),
            vec![
                SentEntry::SendById("first".to_string()),
                SentEntry::SendPlainText("second".to_string()),
                SentEntry::EndById("third".to_string()),
            ]
        );
        assert_eq!(sender.sent_count(), 3);
    }

    #[test]
    fn a_snapshot_is_not_changed_by_later_sends() {
        let sender = RecordingSender::new();
        sender.end();
        let snapshot = sender.history();

        sender.send_by_id("later");
        assert_eq!(snapshot, vec![SentEntry::End]);
        assert_eq!(sender.sent_count(), 2);
    }

    #[test]
    fn clear_empties_the_history() {
        let sender = RecordingSender::new();
        sender.end_plain_text("gone");
        sender.clear();
        assert!(sender.history().is_empty());
    }
}
