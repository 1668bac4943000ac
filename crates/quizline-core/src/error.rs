//! Quiz error types.
//!
//! Collaborators return `anyhow::Result` and raise these inside it, so the
//! session controller and auth context can downcast and classify failures
//! without string matching.

use thiserror::Error;

/// Errors surfaced by quizline operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The requested category has no question set.
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    /// Reporting a finished attempt to the results sink failed.
    #[error("failed to submit quiz results: {0}")]
    Submission(String),

    /// Login was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The auth backend failed for a reason other than bad credentials.
    #[error("auth backend error: {0}")]
    AuthBackend(String),

    /// Reading or writing the persisted user record failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Any other failure from the data provider.
    #[error("quiz source error: {0}")]
    Source(String),
}

impl QuizError {
    /// Classify an error coming back from a collaborator.
    ///
    /// Typed `QuizError`s are passed through; anything else is wrapped with
    /// `fallback`.
    pub fn classify(err: anyhow::Error, fallback: fn(String) -> QuizError) -> QuizError {
        match err.downcast::<QuizError>() {
            Ok(typed) => typed,
            Err(other) => fallback(format!("{other:#}")),
        }
    }

    /// Returns `true` if this error means the requested data does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, QuizError::CategoryNotFound(_))
    }
}
