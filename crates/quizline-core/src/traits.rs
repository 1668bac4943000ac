//! Collaborator traits the session and auth context depend on.
//!
//! Implemented by the `quizline-providers` crate. Implementations may be
//! in-memory mocks, network calls, or database queries; callers never assume
//! synchronous completion.

use async_trait::async_trait;

use crate::model::{Category, Question, QuizSubmission, UserRecord};

// ---------------------------------------------------------------------------
// Quiz data
// ---------------------------------------------------------------------------

/// Source of categories and their question sets.
#[async_trait]
pub trait QuizSource: Send + Sync {
    /// Human-readable source name (e.g. "mock").
    fn name(&self) -> &str;

    /// All categories, in display order.
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>>;

    /// The ordered question set for a category.
    ///
    /// Fails with [`QuizError::CategoryNotFound`](crate::QuizError::CategoryNotFound)
    /// when the category has no question set.
    async fn fetch_questions(&self, category_id: &str) -> anyhow::Result<Vec<Question>>;
}

/// Receiver of finished attempts.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn submit(&self, submission: &QuizSubmission) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Credential checks and account creation.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Fails with [`QuizError::InvalidCredentials`](crate::QuizError::InvalidCredentials)
    /// on mismatch.
    async fn login(&self, email: &str, password: &str) -> anyhow::Result<UserRecord>;

    async fn register(&self, name: &str, email: &str, password: &str)
        -> anyhow::Result<UserRecord>;
}

/// String key-value persistence for the signed-in user.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    fn remove(&self, key: &str) -> anyhow::Result<()>;
}
