pub mod errors;
pub mod context;
pub mod engine;
pub mod diagnostics;
pub mod expression;
mod parser;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use context::ContextStore;
use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use errors::Result;

/// Anything that can answer "does this context expression hold right now".
pub trait ContextMatcher {
    fn matches(&self, expression: &str) -> bool;
}

/// Context keys for one session plus the matcher over them.
///
/// Expressions are untrusted input. They are checked against a closed grammar
/// (identifiers, `true`/`false`, `!`, `&&`, `||`, `==`, `!=`, `===`, `!==`) and
/// folded by a dedicated evaluator; nothing is ever handed to an interpreter.
#[derive(Clone)]
pub struct ContextKeyService {
    store: ContextStore,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for ContextKeyService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContextKeyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextKeyService")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl ContextKeyService {
    /// Seeded store (`editorFocus = true`), failures logged through `tracing`.
    pub fn new() -> Self {
        Self::with_store(ContextStore::new())
    }

    pub fn with_store(store: ContextStore) -> Self {
        Self { store, sink: Arc::new(TracingSink) }
    }

    /// Replace the diagnostic sink.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.store.set_context(key, value);
    }

    pub fn get_context<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.store.get_context(key)
    }

    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    /// Typed outcome of evaluating `expression`.
    pub fn try_match(&self, expression: &str) -> Result<bool> {
        engine::evaluate(&self.store, expression)
    }

    /// `true` only if `expression` is well formed and holds. Malformed input is
    /// reported to the sink and reads as `false`.
    pub fn matches(&self, expression: &str) -> bool {
        self.match_or_report(expression).unwrap_or(false)
    }

    /// Like [`try_match`](Self::try_match), but a failure is also sent to the
    /// sink before it is returned.
    pub fn match_or_report(&self, expression: &str) -> Result<bool> {
        self.try_match(expression).map_err(|error| {
            self.sink.warn(&Diagnostic { expression: expression.to_string(), error: error.clone() });
            error
        })
    }
}

impl ContextMatcher for ContextKeyService {
    fn matches(&self, expression: &str) -> bool {
        ContextKeyService::matches(self, expression)
    }
}

/// Re-export the most-used items.
pub use context::{truthy, ContextKey};
pub use engine::evaluate;
pub use errors::MatchError;
pub use expression::Expression;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use pretty_assertions::assert_eq;

    #[test]
    fn matches_flattens_errors_and_reports_them() {
        let sink = RecordingSink::new();
        let svc = ContextKeyService::new().with_sink(sink.clone());

        assert!(svc.matches("editorFocus"));
        assert!(!svc.matches(" alert(1) "));

        let seen = sink.diagnostics();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].expression, " alert(1) ");
        assert_eq!(seen[0].error.kind(), "grammar_rejected");
    }

    #[test]
    fn match_or_report_returns_the_error_it_reports() {
        let sink = RecordingSink::new();
        let svc = ContextKeyService::new().with_sink(sink.clone());

        assert_eq!(svc.match_or_report("editorFocus"), Ok(true));
        assert!(sink.diagnostics().is_empty());

        let err = svc.match_or_report("a.b").unwrap_err();
        let seen = sink.diagnostics();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].expression, "a.b");
        assert_eq!(seen[0].error, err);
    }

    #[test]
    fn try_match_keeps_the_error() {
        let svc = ContextKeyService::new();
        assert_eq!(svc.try_match("true"), Ok(true));
        assert!(matches!(svc.try_match("a;b"), Err(MatchError::GrammarRejected { .. })));
    }

    #[test]
    fn usable_through_the_trait() {
        fn gate(m: &dyn ContextMatcher, when: &str) -> bool {
            m.matches(when)
        }
        let mut svc = ContextKeyService::new();
        svc.set_context("visible", true);
        assert!(gate(&svc, "editorFocus && visible"));
    }
}
