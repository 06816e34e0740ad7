//! Output port towards the connector layer.

/// Where a story's messages go.
///
/// `send*` operations keep the turn open for further traversal; `end*`
/// operations close it. Every turn closes with exactly one `end*` call
/// (or a bare [`TickSender::end`] when there is nothing to say).
///
/// All operations are fire-and-forget from the engine's perspective:
/// delivery failures are the implementation's concern and must never
/// abort a turn.
pub trait TickSender: Send + Sync {
    /// Sends an answer by id, keeping the turn open.
    fn send_by_id(&self, answer_id: &str);

    /// Sends an answer by id and closes the turn.
    fn end_by_id(&self, answer_id: &str);

    /// Sends plain text, keeping the turn open.
    fn send_plain_text(&self, text: &str);

    /// Sends plain text and closes the turn.
    fn end_plain_text(&self, text: &str);

    /// Closes the turn without a message.
    fn end(&self);
}
