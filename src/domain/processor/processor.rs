//! The per-turn engine: resolves one user action against a loaded story.
//!
//! A processor is built for exactly one turn and consumed by
//! [`TickStoryProcessor::process`]. It owns the session for the duration
//! of the turn and only hands it back on success, so a failed turn leaves
//! nothing half-applied: the caller keeps the previous session and no
//! queued answer reaches the sender.

use std::collections::BTreeSet;

use crate::domain::foundation::ProcessingError;
use crate::domain::session::TickSession;
use crate::domain::story::{LoadedStory, UnknownHandlingStep};
use crate::ports::TickSender;

use super::user_action::TickUserAction;

/// The result of one processed turn.
#[derive(Debug, Clone)]
pub struct ProcessedTurn {
    /// Session to persist for the next turn.
    pub session: TickSession,

    /// Whether the story is over. Mirrors `session.finished`; the next
    /// turn starts from a fresh session.
    pub is_final: bool,
}

/// Answer queued while the turn traverses states, flushed once it settles.
#[derive(Debug)]
enum QueuedAnswer {
    ById(String),
    PlainText(String),
}

/// Processes one user turn against one story.
pub struct TickStoryProcessor<'a> {
    session: TickSession,
    story: &'a LoadedStory,
    sender: &'a dyn TickSender,
    answers: Vec<QueuedAnswer>,
    visited: BTreeSet<String>,
}

impl<'a> TickStoryProcessor<'a> {
    pub fn new(session: TickSession, story: &'a LoadedStory, sender: &'a dyn TickSender) -> Self {
        Self {
            session,
            story,
            sender,
            answers: Vec::new(),
            visited: BTreeSet::new(),
        }
    }

    /// Runs the turn: captures entities, resolves the intent against the
    /// current state, executes the reached actions (following automatic
    /// transitions as far as accumulated contexts allow) and flushes the
    /// queued answers.
    ///
    /// An unresolvable intent goes through the unknown-answer policy of
    /// the pending action instead of a transition.
    pub fn process(
        mut self,
        user_action: &TickUserAction,
    ) -> Result<ProcessedTurn, ProcessingError> {
        self.capture_entities(user_action);

        if let Some(state) = self.session.current_state.clone() {
            if !self.story.machine().contains_state(&state) {
                return Err(ProcessingError::UnknownSessionState { state });
            }
        }
        let current = self
            .session
            .current_state
            .clone()
            .unwrap_or_else(|| self.story.machine().initial().to_string());

        match self.story.machine().transition(&current, &user_action.intent_name) {
            Some(target) => {
                let target = target.to_string();
                // The user was understood, any retry episode is over.
                self.session.unknown_handling_step = None;
                if self.session.objectives_stack.last() != Some(&target) {
                    self.session.objectives_stack.push(target.clone());
                }
                self.run_from(target)?;
            }
            None => self.handle_unresolved(&current, &user_action.intent_name)?,
        }

        Ok(self.settle())
    }

    /// Copies entity values into the contexts bound to their roles.
    fn capture_entities(&mut self, user_action: &TickUserAction) {
        for context in &self.story.configuration().contexts {
            let Some(role) = &context.entity_role else {
                continue;
            };
            if let Some(value) = user_action.entities.get(role) {
                self.session
                    .contexts
                    .insert(context.name.clone(), Some(value.clone()));
            }
        }
    }

    /// Executes `target` and keeps advancing while some outgoing
    /// transition leads to a state whose action already has all its
    /// inputs. A state executed earlier this turn is not re-entered.
    fn run_from(&mut self, target: String) -> Result<(), ProcessingError> {
        let mut state = target;
        loop {
            self.execute_state(&state)?;
            if self.story.machine().is_terminal(&state) {
                self.session.finished = true;
                return Ok(());
            }
            match self.next_auto_state(&state) {
                Some(next) => state = next,
                None => return Ok(()),
            }
        }
    }

    /// Enters a state: records it, invokes its action's handler, merges
    /// the produced contexts and queues its answer.
    fn execute_state(&mut self, state: &str) -> Result<(), ProcessingError> {
        self.visited.insert(state.to_string());
        self.session.current_state = Some(state.to_string());

        let action = self
            .story
            .action(state)
            .ok_or_else(|| ProcessingError::UnboundState {
                state: state.to_string(),
            })?;
        self.session.ran_handlers.push(action.name.clone());

        let debug = self.story.debug_enabled();
        if debug {
            self.queue_context_dump(&action.name, "INPUT");
        }

        if let Some(handler) = self.story.handler_for(state) {
            let produced = handler.invoke(&self.session.contexts)?;
            for (name, value) in produced {
                self.session.contexts.insert(name, value);
            }
        }

        if let Some(answer) = &action.answer_id {
            self.answers.push(QueuedAnswer::ById(answer.clone()));
        }
        if debug {
            self.queue_context_dump(&action.name, "OUTPUT");
        }
        Ok(())
    }

    /// First outgoing transition whose target action declares inputs and
    /// has them all, skipping states already executed this turn. An
    /// action declaring no inputs never fires automatically.
    fn next_auto_state(&self, state: &str) -> Option<String> {
        self.story
            .machine()
            .transitions_from(state)
            .iter()
            .find_map(|transition| {
                if self.visited.contains(&transition.target) {
                    return None;
                }
                let action = self.story.action(&transition.target)?;
                action
                    .inputs_satisfied_by(&self.session.contexts)
                    .then(|| transition.target.clone())
            })
    }

    /// The unknown-intent path: answer with the pending action's fallback
    /// while retries remain, force its exit action once they run out.
    fn handle_unresolved(&mut self, current: &str, intent: &str) -> Result<(), ProcessingError> {
        let pending = self
            .session
            .ran_handlers
            .last()
            .cloned()
            .unwrap_or_else(|| current.to_string());

        let Some(config) = self
            .story
            .action(&pending)
            .and_then(|action| action.unknown_answer_config.as_ref())
            .filter(|config| config.applies_to(intent))
        else {
            // No policy for this intent here: close the turn silently.
            return Ok(());
        };

        let step = match self.session.unknown_handling_step.take() {
            Some(existing) if existing.tracks(config) => existing.increment(),
            _ => UnknownHandlingStep::new(config.key()),
        };

        if step.exceeds(self.story.repetition_limit()) {
            match &config.exit_action {
                Some(exit_action) => self.run_from(exit_action.clone())?,
                None => self.session.finished = true,
            }
        } else {
            self.answers
                .push(QueuedAnswer::ById(config.unknown_answer.clone()));
            self.session.unknown_handling_step = Some(step);
        }
        Ok(())
    }

    /// Queues a plain-text dump of the session contexts, keys sorted.
    fn queue_context_dump(&mut self, action: &str, label: &str) {
        let mut pairs: Vec<String> = self
            .session
            .contexts
            .iter()
            .map(|(name, value)| format!("{name} : {}", value.as_deref().unwrap_or("null")))
            .collect();
        pairs.sort();
        let dump = if pairs.is_empty() {
            format!("[DEBUG] {action} : {label} CONTEXTS [ ]")
        } else {
            format!("[DEBUG] {action} : {label} CONTEXTS [ {} ]", pairs.join(" | "))
        };
        self.answers.push(QueuedAnswer::PlainText(dump));
    }

    /// Closes the turn: pops a settled objective, flushes the queued
    /// answers (every one but the last as a send, the last as an end, a
    /// bare end when nothing was queued) and hands the session back.
    fn settle(mut self) -> ProcessedTurn {
        let settled_on_top = self
            .session
            .objectives_stack
            .last()
            .is_some_and(|top| self.session.current_state.as_deref() == Some(top.as_str()));
        if settled_on_top {
            self.session.objectives_stack.pop();
        }

        let total = self.answers.len();
        if total == 0 {
            self.sender.end();
        } else {
            for (position, answer) in self.answers.iter().enumerate() {
                let last = position + 1 == total;
                match (answer, last) {
                    (QueuedAnswer::ById(id), false) => self.sender.send_by_id(id),
                    (QueuedAnswer::ById(id), true) => self.sender.end_by_id(id),
                    (QueuedAnswer::PlainText(text), false) => self.sender.send_plain_text(text),
                    (QueuedAnswer::PlainText(text), true) => self.sender.end_plain_text(text),
                }
            }
        }

        let is_final = self.session.finished;
        ProcessedTurn {
            session: self.session,
            is_final,
        }
    }
}
