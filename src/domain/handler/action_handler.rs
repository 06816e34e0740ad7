//! Action handlers: the pluggable business functions of a story.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::InvocationError;
use crate::domain::story::ContextMap;

/// What a business function returns: the contexts it produced, or the
/// failure of its own logic. Business failures propagate untouched; the
/// engine applies no retry.
pub type HandlerResult = Result<ContextMap, Box<dyn Error + Send + Sync>>;

/// A named business function together with its declared context contract.
///
/// The contract is enforced on every invocation: declared inputs must all
/// be provided, only declared outputs may be produced, and a handler that
/// declares outputs must produce at least one. Violations carry stable
/// error codes so embedders can match on them.
#[derive(Clone)]
pub struct ActionHandler {
    id: String,
    namespace: String,
    description: Option<String>,
    input_contexts: BTreeSet<String>,
    output_contexts: BTreeSet<String>,
    handler: Arc<dyn Fn(&ContextMap) -> HandlerResult + Send + Sync>,
}

impl ActionHandler {
    /// Creates a handler with an empty contract.
    pub fn new<F>(id: impl Into<String>, namespace: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ContextMap) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            namespace: namespace.into(),
            description: None,
            input_contexts: BTreeSet::new(),
            output_contexts: BTreeSet::new(),
            handler: Arc::new(handler),
        }
    }

    /// Sets the description.
    pub fn describing(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares the contexts this handler requires.
    pub fn with_inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_contexts = names.into_iter().map(Into::into).collect();
        self
    }

    /// Declares the contexts this handler may produce.
    pub fn with_outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_contexts = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn input_contexts(&self) -> &BTreeSet<String> {
        &self.input_contexts
    }

    pub fn output_contexts(&self) -> &BTreeSet<String> {
        &self.output_contexts
    }

    /// Runs the business function under the declared contract.
    ///
    /// `provided` may hold more keys than the declared inputs; accumulated
    /// context is tolerated. The checks, in order:
    ///
    /// 1. every declared input present, else the error names exactly the
    ///    missing set, sorted;
    /// 2. the function runs; its own failure is wrapped and propagated;
    /// 3. every produced key must be declared as an output;
    /// 4. a handler declaring outputs must produce a non-empty result.
    pub fn invoke(&self, provided: &ContextMap) -> Result<ContextMap, InvocationError> {
        let missing: Vec<String> = self
            .input_contexts
            .iter()
            .filter(|name| !provided.contains_key(name.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(InvocationError::InputContextNotProvided {
                handler: self.id.clone(),
                missing,
            });
        }

        let produced =
            (self.handler)(provided).map_err(|source| InvocationError::HandlerFailed {
                handler: self.id.clone(),
                source,
            })?;

        let mut undeclared: Vec<String> = produced
            .keys()
            .filter(|name| !self.output_contexts.contains(name.as_str()))
            .cloned()
            .collect();
        if !undeclared.is_empty() {
            undeclared.sort();
            return Err(InvocationError::OutputContextNotDeclared {
                handler: self.id.clone(),
                undeclared,
            });
        }

        if produced.is_empty() && !self.output_contexts.is_empty() {
            return Err(InvocationError::NoOutputContextComputed {
                handler: self.id.clone(),
            });
        }

        Ok(produced)
    }
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandler")
            .field("id", &self.id)
            .field("namespace", &self.namespace)
            .field("input_contexts", &self.input_contexts)
            .field("output_contexts", &self.output_contexts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn contexts_of(names: &[&str]) -> ContextMap {
        names
            .iter()
            .map(|name| (name.to_string(), None))
            .collect()
    }

    fn echo_handler(outputs: &'static [&'static str]) -> ActionHandler {
        ActionHandler::new("h", "tests", move |_| Ok(contexts_of(outputs)))
    }

    #[test]
    fn invoke_with_full_inputs_returns_the_exact_declared_outputs() {
        let handler = echo_handler(&["CONTEXT_3", "CONTEXT_4", "CONTEXT_5"])
            .with_inputs(["CONTEXT_1", "CONTEXT_2"])
            .with_outputs(["CONTEXT_3", "CONTEXT_4", "CONTEXT_5"]);

        let produced = handler
            .invoke(&contexts_of(&["CONTEXT_1", "CONTEXT_2"]))
            .unwrap();

        assert_eq!(produced, contexts_of(&["CONTEXT_3", "CONTEXT_4", "CONTEXT_5"]));
    }

    #[test]
    fn surplus_provided_contexts_are_tolerated() {
        let handler = echo_handler(&["OUT"])
            .with_inputs(["CONTEXT_1"])
            .with_outputs(["OUT"]);

        let provided = contexts_of(&["CONTEXT_1", "EXTRA_A", "EXTRA_B"]);
        assert!(handler.invoke(&provided).is_ok());
    }

    #[test]
    fn missing_input_names_exactly_the_missing_set() {
        let handler = echo_handler(&["OUT"])
            .with_inputs(["CONTEXT_1", "CONTEXT_2"])
            .with_outputs(["OUT"]);

        let err = handler.invoke(&contexts_of(&["CONTEXT_1"])).unwrap_err();
        match err {
            InvocationError::InputContextNotProvided { handler, missing } => {
                assert_eq!(handler, "h");
                assert_eq!(missing, vec!["CONTEXT_2".to_string()]);
            }
            other => panic!("expected missing input error, got {other:?}"),
        }
    }

    #[test]
    fn missing_inputs_are_reported_sorted() {
        let handler = echo_handler(&["OUT"])
            .with_inputs(["B_CONTEXT", "A_CONTEXT", "C_CONTEXT"])
            .with_outputs(["OUT"]);

        let err = handler.invoke(&contexts_of(&["B_CONTEXT"])).unwrap_err();
        match err {
            InvocationError::InputContextNotProvided { missing, .. } => {
                assert_eq!(missing, vec!["A_CONTEXT".to_string(), "C_CONTEXT".to_string()]);
            }
            other => panic!("expected missing input error, got {other:?}"),
        }
    }

    #[test]
    fn undeclared_output_is_rejected() {
        let handler = echo_handler(&["CONTEXT_X"]).with_outputs(["CONTEXT_3"]);

        let err = handler.invoke(&HashMap::new()).unwrap_err();
        match err {
            InvocationError::OutputContextNotDeclared { undeclared, .. } => {
                assert_eq!(undeclared, vec!["CONTEXT_X".to_string()]);
            }
            other => panic!("expected undeclared output error, got {other:?}"),
        }
    }

    #[test]
    fn declared_outputs_with_empty_result_is_rejected() {
        let handler = echo_handler(&[]).with_outputs(["CONTEXT_3"]);

        let err = handler.invoke(&HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            InvocationError::NoOutputContextComputed { handler } if handler == "h"
        ));
    }

    #[test]
    fn handler_with_no_declared_outputs_may_return_nothing() {
        let handler = echo_handler(&[]);
        assert!(handler.invoke(&HashMap::new()).unwrap().is_empty());
    }

    #[test]
    fn business_failure_is_wrapped_with_the_handler_id() {
        let handler = ActionHandler::new("check_limit", "bank", |_| Err("backend down".into()));

        let err = handler.invoke(&HashMap::new()).unwrap_err();
        match err {
            InvocationError::HandlerFailed { handler, source } => {
                assert_eq!(handler, "check_limit");
                assert_eq!(source.to_string(), "backend down");
            }
            other => panic!("expected handler failure, got {other:?}"),
        }
    }

    #[test]
    fn inputs_are_checked_before_the_function_runs() {
        let handler = ActionHandler::new("h", "tests", |_| {
            panic!("must not run when inputs are missing")
        })
        .with_inputs(["REQUIRED"]);

        let err = handler.invoke(&HashMap::new()).unwrap_err();
        assert!(matches!(err, InvocationError::InputContextNotProvided { .. }));
    }
}
