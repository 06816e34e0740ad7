//! TickTurnHandler - drive one story through one user turn.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::ProcessingError;
use crate::domain::processor::{TickStoryProcessor, TickUserAction};
use crate::domain::session::{init_tick_session, Dialog, TickSession};
use crate::domain::story::LoadedStory;
use crate::ports::TickSender;

/// Result of one handled turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Session as recorded on the dialog.
    pub session: TickSession,

    /// Whether the story is over for this conversation.
    pub is_final: bool,
}

/// Handles user turns for one loaded story.
///
/// Wires session initialization, the processor and the dialog record
/// together. On success the dialog carries the new session; on failure
/// it is left exactly as it was, so a broken turn can be retried.
pub struct TickTurnHandler {
    story: Arc<LoadedStory>,
    sender: Arc<dyn TickSender>,
}

impl TickTurnHandler {
    pub fn new(story: Arc<LoadedStory>, sender: Arc<dyn TickSender>) -> Self {
        Self { story, sender }
    }

    pub fn handle(
        &self,
        dialog: &mut Dialog,
        conversation_data: &HashMap<String, String>,
        user_action: &TickUserAction,
    ) -> Result<TurnOutcome, ProcessingError> {
        // 1. Build the session this turn runs against
        let session = init_tick_session(dialog, self.story.story_id(), conversation_data);

        // 2. Process the turn
        let turn = TickStoryProcessor::new(session, &self.story, self.sender.as_ref())
            .process(user_action)?;

        debug!(
            story_id = %self.story.story_id(),
            dialog_id = %dialog.id,
            intent = %user_action.intent_name,
            state = turn.session.current_state.as_deref().unwrap_or("<initial>"),
            is_final = turn.is_final,
            "Processed tick turn"
        );

        // 3. Record the new state on the dialog
        dialog.record_tick_state(self.story.story_id(), turn.session.clone());

        Ok(TurnOutcome {
            session: turn.session,
            is_final: turn.is_final,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{RecordingSender, SentEntry};
    use crate::domain::foundation::DialogId;
    use crate::domain::handler::{ActionHandler, HandlerRegistry};
    use crate::domain::machine::State;
    use crate::domain::story::{TickAction, TickConfiguration, TickContext};

    fn story() -> Arc<LoadedStory> {
        let mut registry = HandlerRegistry::new();
        registry
            .register(
                ActionHandler::new("bank:check_limit", "bank", |_| {
                    Ok(HashMap::from([(
                        "CAN_CHANGE_LIMIT".to_string(),
                        Some("true".to_string()),
                    )]))
                })
                .with_inputs(["MONTANT_VIREMENT"])
                .with_outputs(["CAN_CHANGE_LIMIT"]),
            )
            .unwrap();

        let config = TickConfiguration::new(
            "transfer_limit",
            State::group(
                "transfer_limit",
                "intro",
                [
                    State::leaf("intro").with_transition("check_transfer", "#check_transfer_limit"),
                    State::leaf("check_transfer_limit")
                        .with_transition("limit_checked", "#show_can_change"),
                    State::leaf("show_can_change").with_transition("confirm_raise", "#goodbye"),
                    State::terminal_leaf("goodbye"),
                ],
            ),
            [
                TickContext::with_entity_role("MONTANT_VIREMENT", "amount"),
                TickContext::new("CAN_CHANGE_LIMIT"),
            ],
            [
                TickAction::new("intro").with_answer("intro_message"),
                TickAction::new("check_transfer_limit")
                    .with_handler("bank:check_limit")
                    .with_inputs(["MONTANT_VIREMENT"])
                    .with_outputs(["CAN_CHANGE_LIMIT"]),
                TickAction::new("show_can_change")
                    .with_answer("can_change_limit_message")
                    .with_inputs(["CAN_CHANGE_LIMIT"]),
                TickAction::new("goodbye").with_answer("goodbye_message"),
            ],
        );
        Arc::new(LoadedStory::load(config, &registry).unwrap())
    }

    #[test]
    fn turns_accumulate_on_the_dialog_until_the_story_finishes() {
        let story = story();
        let sender = Arc::new(RecordingSender::new());
        let handler = TickTurnHandler::new(story, sender.clone());
        let mut dialog = Dialog::new(DialogId::new());

        let first = handler
            .handle(
                &mut dialog,
                &HashMap::new(),
                &TickUserAction::new("check_transfer").with_entity("amount", "2000"),
            )
            .unwrap();
        assert!(!first.is_final);
        assert_eq!(
            dialog
                .tick_state("transfer_limit")
                .unwrap()
                .current_state
                .as_deref(),
            Some("show_can_change")
        );

        let second = handler
            .handle(
                &mut dialog,
                &HashMap::new(),
                &TickUserAction::new("confirm_raise"),
            )
            .unwrap();
        assert!(second.is_final);
        assert!(dialog.tick_state("transfer_limit").unwrap().finished);

        assert_eq!(
            sender.history(),
            vec![
                SentEntry::EndById("can_change_limit_message".to_string()),
                SentEntry::EndById("goodbye_message".to_string()),
            ]
        );
    }

    #[test]
    fn a_finished_story_restarts_from_a_fresh_session() {
        let story = story();
        let sender = Arc::new(RecordingSender::new());
        let handler = TickTurnHandler::new(story, sender.clone());
        let mut dialog = Dialog::new(DialogId::new());

        handler
            .handle(
                &mut dialog,
                &HashMap::new(),
                &TickUserAction::new("check_transfer").with_entity("amount", "2000"),
            )
            .unwrap();
        handler
            .handle(
                &mut dialog,
                &HashMap::new(),
                &TickUserAction::new("confirm_raise"),
            )
            .unwrap();

        // the stored run is finished, so this turn starts over from intro
        let replay = handler
            .handle(
                &mut dialog,
                &HashMap::new(),
                &TickUserAction::new("check_transfer").with_entity("amount", "500"),
            )
            .unwrap();
        assert!(!replay.is_final);
        assert_eq!(
            replay.session.ran_handlers,
            vec!["check_transfer_limit", "show_can_change"]
        );
        assert_eq!(
            replay.session.contexts.get("MONTANT_VIREMENT"),
            Some(&Some("500".to_string()))
        );
    }

    #[test]
    fn conversation_data_can_satisfy_handler_inputs() {
        let story = story();
        let sender = Arc::new(RecordingSender::new());
        let handler = TickTurnHandler::new(story, sender);
        let mut dialog = Dialog::new(DialogId::new());

        let data = HashMap::from([("MONTANT_VIREMENT".to_string(), "2000".to_string())]);
        let outcome = handler
            .handle(&mut dialog, &data, &TickUserAction::new("check_transfer"))
            .unwrap();

        assert_eq!(
            outcome.session.current_state.as_deref(),
            Some("show_can_change")
        );
    }

    #[test]
    fn a_failed_turn_leaves_the_dialog_untouched() {
        let story = story();
        let sender = Arc::new(RecordingSender::new());
        let handler = TickTurnHandler::new(story, sender.clone());
        let mut dialog = Dialog::new(DialogId::new());

        // no amount entity and no conversation data: the handler's input
        // contract fails once the transition reaches it
        let result = handler.handle(
            &mut dialog,
            &HashMap::new(),
            &TickUserAction::new("check_transfer"),
        );

        assert!(result.is_err());
        assert!(dialog.tick_state("transfer_limit").is_none());
        assert!(sender.history().is_empty());
    }
}
