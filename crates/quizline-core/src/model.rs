//! Core data model types for quizline.
//!
//! Field names serialize in camelCase to match the records the web client
//! exchanged with its data API and local storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named grouping of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Identifier used to fetch the question set.
    pub id: String,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Declared number of questions. Informational only; the loaded set may differ.
    #[serde(default)]
    pub question_count: u32,
    /// Free-form difficulty label (e.g. "easy", "medium", "hard").
    #[serde(default)]
    pub difficulty: String,
}

/// A multiple-choice question as held by the scoring side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique within its category.
    pub id: String,
    /// The prompt shown to the user.
    pub text: String,
    /// Options in display order.
    pub options: Vec<String>,
    /// The correct option, when this copy is authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl Question {
    /// Whether `answer` matches this question's correct option.
    ///
    /// A question without a recorded correct answer never scores.
    pub fn is_correct(&self, answer: Option<&str>) -> bool {
        match (self.correct_answer.as_deref(), answer) {
            (Some(expected), Some(given)) => expected == given,
            _ => false,
        }
    }

    /// The public projection handed to rendering before completion.
    pub fn view(&self) -> QuestionView<'_> {
        QuestionView {
            id: &self.id,
            text: &self.text,
            options: &self.options,
        }
    }
}

/// A question without its answer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionView<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub options: &'a [String],
}

/// Question id → chosen option.
pub type SelectedAnswers = BTreeMap<String, String>;

/// Aggregate statistics shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub completed: u32,
    pub average_score: u32,
    pub best_category: String,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            completed: 0,
            average_score: 0,
            best_category: "N/A".to_string(),
        }
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<UserStats>,
}

/// A finished attempt reported to the results sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub category_id: String,
    pub user_id: String,
    /// Percentage in `0..=100`.
    pub score: u32,
    pub answers: SelectedAnswers,
    #[serde(rename = "timeSpentSeconds")]
    pub time_spent_secs: u32,
    pub submitted_at: DateTime<Utc>,
}

/// Why an attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The user advanced past the last question.
    Finished,
    /// The countdown reached zero.
    TimeExpired,
}

/// The scored result of a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    /// Percentage in `0..=100`.
    pub score: u32,
    pub correct: usize,
    pub total: usize,
    pub time_spent_secs: u32,
    pub reason: CompletionReason,
}
