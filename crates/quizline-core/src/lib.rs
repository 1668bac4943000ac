//! quizline-core — Quiz session controller, data model, and traits.
//!
//! This crate defines the data contracts, the collaborator traits the
//! session depends on, and the timed quiz state machine itself.

pub mod auth;
pub mod countdown;
pub mod error;
pub mod model;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod traits;

pub use auth::AuthSession;
pub use error::QuizError;
pub use session::{Phase, QuizSession, SessionOptions};
