//! quizline-providers — Collaborators for the quiz session and auth context.
//!
//! Implements the `quizline-core` traits with an in-memory question bank,
//! a recording results sink, a demo auth backend, and key-value stores
//! backed by memory or a JSON file.

pub mod config;
pub mod error;
pub mod mock;
pub mod store;

pub use config::{load_config_from, LatencyConfig, QuizlineConfig};
pub use error::StoreError;
pub use mock::{MockAuthBackend, MockQuizSource, MockResultSink};
pub use store::{FileStore, MemoryStore};
