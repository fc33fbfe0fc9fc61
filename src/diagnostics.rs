use crate::errors::MatchError;
use std::sync::{Arc, Mutex};

/// What a sink is told when an expression does not evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The input exactly as the caller passed it (untrimmed).
    pub expression: String,
    pub error: MatchError,
}

/// Receiver for failed matches. Implementations must not panic; whatever they
/// do, the caller still gets `false`.
pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, diagnostic: &Diagnostic);
}

/// Default sink: one `WARN` event per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            expression = %diagnostic.expression,
            kind = diagnostic.error.kind(),
            error = %diagnostic.error,
            "invalid context expression"
        );
    }
}

/// Keeps every diagnostic in memory. Useful for hosts that surface bad
/// `when` clauses to users, and for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Vec<Diagnostic>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for RecordingSink {
    fn warn(&self, diagnostic: &Diagnostic) {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recording_sink_shares_storage_between_clones() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        let d = Diagnostic {
            expression: "a;".into(),
            error: MatchError::GrammarRejected { reason: "x".into() },
        };
        sink.warn(&d);
        assert_eq!(handle.diagnostics(), vec![d]);
    }

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.warn(&Diagnostic {
            expression: String::new(),
            error: MatchError::EvaluationFailed("boom".into()),
        });
    }
}
