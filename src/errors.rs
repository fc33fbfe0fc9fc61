use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

// Everything that can go wrong between an expression string and a boolean answer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    // The input is not a well-formed context expression (includes empty input)
    #[error("expression rejected: {reason}")]
    GrammarRejected { reason: String },

    // Folding hit a state the grammar should have ruled out
    #[error("evaluation failed: {0}")]
    EvaluationFailed(String),

    // A facts document could not be loaded into a store
    #[error("invalid facts: {0}")]
    InvalidFacts(String),
}

impl MatchError {
    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        MatchError::GrammarRejected { reason: reason.into() }
    }

    /// Short machine-readable name for the error kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchError::GrammarRejected { .. } => "grammar_rejected",
            MatchError::EvaluationFailed(_) => "evaluation_failed",
            MatchError::InvalidFacts(_) => "invalid_facts",
        }
    }
}

// Type alias for results that use `MatchError` as the error type
pub type Result<T> = std::result::Result<T, MatchError>;
