//! Mock collaborators with simulated latency.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use quizline_core::error::QuizError;
use quizline_core::model::{Category, Question, QuizSubmission, UserRecord, UserStats};
use quizline_core::traits::{AuthBackend, QuizSource, ResultSink};

use crate::config::LatencyConfig;

async fn simulate(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

// ---------------------------------------------------------------------------
// Quiz data
// ---------------------------------------------------------------------------

/// An in-memory question bank.
pub struct MockQuizSource {
    categories: Vec<Category>,
    questions: HashMap<String, Vec<Question>>,
    list_latency: Duration,
    fetch_latency: Duration,
    fetch_count: AtomicU32,
}

impl MockQuizSource {
    /// Build a source over the given bank with no latency.
    pub fn new(categories: Vec<Category>, questions: HashMap<String, Vec<Question>>) -> Self {
        Self {
            categories,
            questions,
            list_latency: Duration::ZERO,
            fetch_latency: Duration::ZERO,
            fetch_count: AtomicU32::new(0),
        }
    }

    /// The built-in bank: five categories, question sets for science and history.
    pub fn builtin() -> Self {
        Self::new(builtin_categories(), builtin_questions())
    }

    pub fn with_latency(mut self, latency: &LatencyConfig) -> Self {
        self.list_latency = Duration::from_millis(latency.categories_ms);
        self.fetch_latency = Duration::from_millis(latency.questions_ms);
        self
    }

    /// Number of question fetches made so far.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuizSource for MockQuizSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        simulate(self.list_latency).await;
        Ok(self.categories.clone())
    }

    async fn fetch_questions(&self, category_id: &str) -> anyhow::Result<Vec<Question>> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        simulate(self.fetch_latency).await;
        match self.questions.get(category_id) {
            Some(questions) => Ok(questions.clone()),
            None => Err(QuizError::CategoryNotFound(category_id.to_string()).into()),
        }
    }
}

fn category(id: &str, name: &str, description: &str, difficulty: &str) -> Category {
    Category {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        question_count: 10,
        difficulty: difficulty.into(),
    }
}

fn question(id: &str, text: &str, options: [&str; 4], correct: &str) -> Question {
    Question {
        id: id.into(),
        text: text.into(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: Some(correct.into()),
    }
}

fn builtin_categories() -> Vec<Category> {
    vec![
        category(
            "science",
            "Science",
            "Test your knowledge of scientific concepts and discoveries",
            "medium",
        ),
        category(
            "history",
            "History",
            "Challenge yourself with questions about world history",
            "hard",
        ),
        category(
            "geography",
            "Geography",
            "Explore your knowledge of countries, capitals, and landmarks",
            "easy",
        ),
        category(
            "entertainment",
            "Entertainment",
            "Questions about movies, music, and pop culture",
            "medium",
        ),
        category(
            "sports",
            "Sports",
            "Test your knowledge of various sports and sporting events",
            "medium",
        ),
    ]
}

fn builtin_questions() -> HashMap<String, Vec<Question>> {
    HashMap::from([
        (
            "science".to_string(),
            vec![
                question(
                    "s1",
                    "What is the chemical symbol for gold?",
                    ["Au", "Ag", "Fe", "Gd"],
                    "Au",
                ),
                question(
                    "s2",
                    "Which planet is known as the Red Planet?",
                    ["Venus", "Mars", "Jupiter", "Saturn"],
                    "Mars",
                ),
            ],
        ),
        (
            "history".to_string(),
            vec![
                question(
                    "h1",
                    "In which year did World War II end?",
                    ["1943", "1944", "1945", "1946"],
                    "1945",
                ),
                question(
                    "h2",
                    "Who was the first President of the United States?",
                    [
                        "Thomas Jefferson",
                        "John Adams",
                        "George Washington",
                        "James Madison",
                    ],
                    "George Washington",
                ),
            ],
        ),
    ])
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A results sink that logs and keeps every submission it receives.
pub struct MockResultSink {
    latency: Duration,
    fail: bool,
    submissions: Mutex<Vec<QuizSubmission>>,
}

impl MockResultSink {
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            fail: false,
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// A sink whose every submission fails after being recorded.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with_latency(mut self, latency: &LatencyConfig) -> Self {
        self.latency = Duration::from_millis(latency.submit_ms);
        self
    }

    pub fn submissions(&self) -> Vec<QuizSubmission> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl Default for MockResultSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultSink for MockResultSink {
    async fn submit(&self, submission: &QuizSubmission) -> anyhow::Result<()> {
        simulate(self.latency).await;
        self.submissions
            .lock()
            .map_err(|_| anyhow::anyhow!("submission log poisoned"))?
            .push(submission.clone());

        if self.fail {
            return Err(QuizError::Submission("results endpoint unavailable".into()).into());
        }
        tracing::info!(
            category = %submission.category_id,
            payload = %serde_json::to_string(submission)?,
            "quiz results received"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Email accepted by [`MockAuthBackend::login`].
pub const DEMO_EMAIL: &str = "user@example.com";
/// Password accepted by [`MockAuthBackend::login`].
pub const DEMO_PASSWORD: &str = "password";

/// Accepts the single demo account and any registration.
pub struct MockAuthBackend {
    latency: Duration,
}

impl MockAuthBackend {
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: &LatencyConfig) -> Self {
        self.latency = Duration::from_millis(latency.auth_ms);
        self
    }
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn login(&self, email: &str, password: &str) -> anyhow::Result<UserRecord> {
        simulate(self.latency).await;
        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            return Err(QuizError::InvalidCredentials.into());
        }
        Ok(UserRecord {
            id: "1".into(),
            name: "Demo User".into(),
            email: DEMO_EMAIL.into(),
            stats: Some(UserStats {
                completed: 5,
                average_score: 78,
                best_category: "Science".into(),
            }),
        })
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> anyhow::Result<UserRecord> {
        simulate(self.latency).await;
        Ok(UserRecord {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            stats: Some(UserStats::default()),
        })
    }
}
