//! Quiz session controller.
//!
//! Drives one timed attempt over a category's question set:
//! `NotStarted → Running → Completed`. Completion happens either when the
//! user advances past the last question or when the countdown runs out, and
//! is scored and reported exactly once.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::countdown::Countdown;
use crate::error::QuizError;
use crate::model::{
    CompletionReason, Question, QuestionView, QuizOutcome, QuizSubmission, SelectedAnswers,
    UserRecord,
};
use crate::scoring;
use crate::timer::TimerDisplay;
use crate::traits::{QuizSource, ResultSink};

/// Default time budget for an attempt, in seconds.
pub const DEFAULT_TIME_BUDGET_SECS: u32 = 300;

/// Configuration for a single attempt.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Seconds on the clock when the attempt starts.
    pub time_budget_secs: u32,
    /// Wall-clock length of one countdown tick.
    pub tick_period: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            time_budget_secs: DEFAULT_TIME_BUDGET_SECS,
            tick_period: Duration::from_secs(1),
        }
    }
}

/// Lifecycle phase of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Completed,
}

/// Where to report the finished attempt.
struct Reporter {
    user_id: String,
    sink: Arc<dyn ResultSink>,
}

/// State and operations for one quiz attempt.
///
/// Owned by a single caller; dropping it abandons the attempt and aborts the
/// countdown.
pub struct QuizSession {
    category_id: String,
    questions: Vec<Question>,
    current: usize,
    answers: SelectedAnswers,
    time_budget: u32,
    time_remaining: u32,
    tick_period: Duration,
    phase: Phase,
    outcome: Option<QuizOutcome>,
    countdown: Option<Countdown>,
    reporter: Option<Reporter>,
    submission: Option<JoinHandle<()>>,
}

impl QuizSession {
    /// Fetch the question set for `category_id` and create a session for it.
    ///
    /// The source is asked once; a missing category comes back as
    /// [`QuizError::CategoryNotFound`] and no session is created.
    pub async fn load(
        source: &dyn QuizSource,
        category_id: &str,
        options: SessionOptions,
    ) -> Result<Self, QuizError> {
        let questions = source
            .fetch_questions(category_id)
            .await
            .map_err(|e| QuizError::classify(e, QuizError::Source))?;
        tracing::debug!(
            category = category_id,
            source = source.name(),
            questions = questions.len(),
            "loaded question set"
        );
        Ok(Self::new(category_id, questions, options))
    }

    /// Create a session over an already loaded question set.
    pub fn new(
        category_id: impl Into<String>,
        questions: Vec<Question>,
        options: SessionOptions,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            questions,
            current: 0,
            answers: SelectedAnswers::new(),
            time_budget: options.time_budget_secs,
            time_remaining: options.time_budget_secs,
            tick_period: options.tick_period,
            phase: Phase::NotStarted,
            outcome: None,
            countdown: None,
            reporter: None,
            submission: None,
        }
    }

    /// Report the finished attempt to `sink` if `user` is signed in.
    pub fn with_reporting(mut self, user: Option<&UserRecord>, sink: Arc<dyn ResultSink>) -> Self {
        self.reporter = user.map(|u| Reporter {
            user_id: u.id.clone(),
            sink,
        });
        self
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Begin the attempt and start the countdown. No-op unless `NotStarted`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if self.phase != Phase::NotStarted {
            return;
        }
        self.phase = Phase::Running;
        tracing::debug!(
            category = %self.category_id,
            budget_secs = self.time_budget,
            "quiz started"
        );
        if self.time_remaining == 0 {
            self.finish(CompletionReason::TimeExpired);
        } else {
            self.countdown = Some(Countdown::spawn(self.tick_period));
        }
    }

    /// Record (or overwrite) the answer for any question in the set.
    ///
    /// The option is not checked against the question's options.
    pub fn select_answer(&mut self, question_id: &str, option: &str) {
        if self.phase != Phase::Running {
            tracing::debug!(question = question_id, phase = ?self.phase, "answer ignored");
            return;
        }
        self.answers.insert(question_id.to_string(), option.to_string());
    }

    /// Move to the next question, or complete the attempt from the last one.
    pub fn next(&mut self) -> Option<&QuizOutcome> {
        if self.phase != Phase::Running {
            return self.outcome.as_ref();
        }
        if self.current + 1 >= self.questions.len() {
            return self.complete();
        }
        self.current += 1;
        None
    }

    /// Move to the previous question. No-op on the first.
    pub fn previous(&mut self) {
        if self.phase == Phase::Running && self.current > 0 {
            self.current -= 1;
        }
    }

    /// Apply one elapsed countdown period. Completes the attempt when the
    /// clock reaches zero.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            tracing::debug!(category = %self.category_id, "time expired");
            self.finish(CompletionReason::TimeExpired);
        }
    }

    /// Score the attempt and report it. Idempotent: later calls return the
    /// outcome computed by the first. Returns `None` before `start`.
    pub fn complete(&mut self) -> Option<&QuizOutcome> {
        if self.phase == Phase::Running {
            self.finish(CompletionReason::Finished);
        }
        self.outcome.as_ref()
    }

    fn finish(&mut self, reason: CompletionReason) {
        if let Some(mut countdown) = self.countdown.take() {
            countdown.cancel();
        }

        let tally = scoring::tally(&self.questions, &self.answers);
        let outcome = QuizOutcome {
            score: tally.percent(),
            correct: tally.correct,
            total: tally.total,
            time_spent_secs: self.time_spent_secs(),
            reason,
        };
        tracing::info!(
            category = %self.category_id,
            score = outcome.score,
            correct = outcome.correct,
            total = outcome.total,
            reason = ?reason,
            "quiz completed"
        );

        self.phase = Phase::Completed;
        self.submission = self.reporter.as_ref().map(|reporter| {
            let submission = QuizSubmission {
                category_id: self.category_id.clone(),
                user_id: reporter.user_id.clone(),
                score: outcome.score,
                answers: self.answers.clone(),
                time_spent_secs: outcome.time_spent_secs,
                submitted_at: Utc::now(),
            };
            spawn_submission(Arc::clone(&reporter.sink), submission)
        });
        self.outcome = Some(outcome);
    }

    // -----------------------------------------------------------------------
    // Async drivers
    // -----------------------------------------------------------------------

    /// Wait for the next countdown tick and apply it, returning the seconds
    /// left. Never resolves while no countdown is running, so it can sit in a
    /// `tokio::select!` next to user input.
    pub async fn next_tick(&mut self) -> u32 {
        let tick = match self.countdown.as_mut() {
            Some(countdown) => countdown.tick().await,
            None => std::future::pending().await,
        };
        match tick {
            Some(()) => self.tick(),
            None => self.countdown = None,
        }
        self.time_remaining
    }

    /// Wait for an in-flight result submission to finish.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.submission.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "result submission task failed");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question at the current index, without its answer key.
    pub fn current_question(&self) -> Option<QuestionView<'_>> {
        self.questions.get(self.current).map(Question::view)
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    /// Position through the set as a rounded percentage.
    pub fn progress_percent(&self) -> u32 {
        scoring::percent(
            (self.current + 1).min(self.questions.len()),
            self.questions.len(),
        )
    }

    pub fn selected_answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn answers(&self) -> &SelectedAnswers {
        &self.answers
    }

    pub fn time_budget_secs(&self) -> u32 {
        self.time_budget
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn time_spent_secs(&self) -> u32 {
        self.time_budget - self.time_remaining
    }

    pub fn timer(&self) -> TimerDisplay {
        TimerDisplay::new(self.time_remaining)
    }

    pub fn countdown_active(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    /// The full question set with answer keys, available once completed.
    pub fn review(&self) -> Option<&[Question]> {
        match self.phase {
            Phase::Completed => Some(&self.questions),
            _ => None,
        }
    }
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("category_id", &self.category_id)
            .field("questions", &self.questions.len())
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("time_remaining", &self.time_remaining)
            .field("outcome", &self.outcome)
            .finish()
    }
}

fn spawn_submission(sink: Arc<dyn ResultSink>, submission: QuizSubmission) -> JoinHandle<()> {
    tokio::spawn(async move {
        match sink.submit(&submission).await {
            Ok(()) => tracing::info!(
                category = %submission.category_id,
                user = %submission.user_id,
                score = submission.score,
                "quiz results submitted"
            ),
            Err(e) => {
                let err = QuizError::classify(e, QuizError::Submission);
                tracing::warn!(
                    category = %submission.category_id,
                    error = %err,
                    "failed to submit quiz results"
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::model::Category;

    struct FixedSource {
        questions: Vec<Question>,
        delay: Duration,
    }

    #[async_trait]
    impl QuizSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
            Ok(vec![])
        }

        async fn fetch_questions(&self, category_id: &str) -> anyhow::Result<Vec<Question>> {
            tokio::time::sleep(self.delay).await;
            if category_id == "science" {
                Ok(self.questions.clone())
            } else {
                Err(QuizError::CategoryNotFound(category_id.to_string()).into())
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        fail: bool,
        submissions: Mutex<Vec<QuizSubmission>>,
    }

    impl RecordingSink {
        fn count(&self) -> usize {
            self.submissions.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ResultSink for RecordingSink {
        async fn submit(&self, submission: &QuizSubmission) -> anyhow::Result<()> {
            self.submissions.lock().unwrap().push(submission.clone());
            if self.fail {
                anyhow::bail!("results endpoint unavailable");
            }
            Ok(())
        }
    }

    fn science() -> Vec<Question> {
        vec![
            Question {
                id: "s1".into(),
                text: "What is the chemical symbol for gold?".into(),
                options: vec!["Au".into(), "Ag".into(), "Fe".into(), "Gd".into()],
                correct_answer: Some("Au".into()),
            },
            Question {
                id: "s2".into(),
                text: "Which planet is known as the Red Planet?".into(),
                options: vec![
                    "Venus".into(),
                    "Mars".into(),
                    "Jupiter".into(),
                    "Saturn".into(),
                ],
                correct_answer: Some("Mars".into()),
            },
        ]
    }

    fn demo_user() -> UserRecord {
        UserRecord {
            id: "1".into(),
            name: "Demo User".into(),
            email: "user@example.com".into(),
            stats: None,
        }
    }

    fn running(questions: Vec<Question>) -> QuizSession {
        let mut session = QuizSession::new("science", questions, SessionOptions::default());
        session.start();
        session
    }

    #[tokio::test(start_paused = true)]
    async fn science_half_correct_scores_fifty() {
        let sink = Arc::new(RecordingSink::default());
        let mut session = QuizSession::new("science", science(), SessionOptions::default())
            .with_reporting(Some(&demo_user()), sink.clone());
        session.start();

        session.select_answer("s1", "Au");
        assert!(session.next().is_none());
        session.select_answer("s2", "Venus");
        let outcome = session.next().cloned().unwrap();

        assert_eq!(outcome.score, 50);
        assert_eq!(outcome.correct, 1);
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.reason, CompletionReason::Finished);
        assert_eq!(session.phase(), Phase::Completed);

        session.settle().await;
        let submissions = sink.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].score, 50);
        assert_eq!(submissions[0].user_id, "1");
        assert_eq!(submissions[0].category_id, "science");
        assert_eq!(submissions[0].answers.get("s2").unwrap(), "Venus");
    }

    #[tokio::test(start_paused = true)]
    async fn complete_is_idempotent() {
        let sink = Arc::new(RecordingSink::default());
        let mut session = QuizSession::new("science", science(), SessionOptions::default())
            .with_reporting(Some(&demo_user()), sink.clone());
        session.start();
        session.select_answer("s1", "Au");

        let first = session.complete().cloned().unwrap();
        session.select_answer("s2", "Mars");
        let second = session.complete().cloned().unwrap();
        session.next();
        session.tick();

        assert_eq!(first, second);
        assert_eq!(first.score, 50);
        session.settle().await;
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn next_from_last_index_completes() {
        let mut session = running(science());
        session.next();
        assert_eq!(session.current_index(), 1);
        assert!(session.is_last_question());
        assert!(session.next().is_some());
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn previous_is_floored_at_zero() {
        let mut session = running(science());
        session.previous();
        assert_eq!(session.current_index(), 0);
        session.next();
        session.previous();
        session.previous();
        assert_eq!(session.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn answers_can_target_any_question_and_be_overwritten() {
        let mut session = running(science());
        session.select_answer("s2", "Jupiter");
        session.select_answer("s2", "Mars");
        session.select_answer("s1", "Au");
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.selected_answer("s2"), Some("Mars"));
        assert_eq!(session.answers().len(), 2);
        assert_eq!(session.complete().unwrap().score, 100);
    }

    #[tokio::test]
    async fn navigation_before_start_is_ignored() {
        let mut session = QuizSession::new("science", science(), SessionOptions::default());
        session.select_answer("s1", "Au");
        assert!(session.next().is_none());
        assert!(session.complete().is_none());
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent() {
        let mut session = running(science());
        session.tick();
        session.start();
        assert_eq!(session.time_remaining(), DEFAULT_TIME_BUDGET_SECS - 1);
        session.complete();
        session.start();
        assert_eq!(session.phase(), Phase::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoning_a_running_attempt_stops_the_countdown() {
        let metrics = tokio::runtime::Handle::current().metrics();
        let session = running(science());
        assert!(session.countdown_active());
        assert_eq!(metrics.num_alive_tasks(), 1);

        drop(session);
        for _ in 0..10 {
            if metrics.num_alive_tasks() == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(metrics.num_alive_tasks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_at_one_second_expires_exactly_once() {
        let sink = Arc::new(RecordingSink::default());
        let options = SessionOptions {
            time_budget_secs: 1,
            ..Default::default()
        };
        let mut session = QuizSession::new("science", science(), options)
            .with_reporting(Some(&demo_user()), sink.clone());
        session.start();
        session.select_answer("s1", "Au");

        session.tick();
        assert_eq!(session.time_remaining(), 0);
        assert_eq!(session.phase(), Phase::Completed);
        assert!(!session.countdown_active());
        let outcome = session.outcome().cloned().unwrap();
        assert_eq!(outcome.reason, CompletionReason::TimeExpired);
        assert_eq!(outcome.time_spent_secs, 1);
        assert_eq!(outcome.score, 50);

        session.tick();
        session.complete();
        assert_eq!(session.time_remaining(), 0);
        session.settle().await;
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_drives_expiry() {
        let options = SessionOptions {
            time_budget_secs: 3,
            ..Default::default()
        };
        let mut session = QuizSession::new("science", science(), options);
        session.start();
        assert!(session.countdown_active());

        let started = tokio::time::Instant::now();
        let mut seen = Vec::new();
        while session.phase() == Phase::Running {
            seen.push(session.next_tick().await);
        }

        assert_eq!(seen, vec![2, 1, 0]);
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert!(!session.countdown_active());
        assert_eq!(
            session.outcome().unwrap().reason,
            CompletionReason::TimeExpired
        );
    }

    #[tokio::test(start_paused = true)]
    async fn next_tick_pends_once_completed() {
        let mut session = running(science());
        session.complete();
        let waited =
            tokio::time::timeout(Duration::from_secs(5), session.next_tick()).await;
        assert!(waited.is_err());
        assert_eq!(session.time_remaining(), DEFAULT_TIME_BUDGET_SECS);
    }

    #[tokio::test(start_paused = true)]
    async fn time_spent_reflects_ticks() {
        let mut session = running(science());
        for _ in 0..42 {
            session.tick();
        }
        assert_eq!(session.timer().text, "4:18");
        assert_eq!(session.complete().unwrap().time_spent_secs, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_question_set_completes_with_zero() {
        let mut session = running(vec![]);
        assert!(session.current_question().is_none());
        assert_eq!(session.progress_percent(), 0);
        let outcome = session.next().cloned().unwrap();
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total, 0);
        assert_eq!(session.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthenticated_completion_does_not_submit() {
        let sink = Arc::new(RecordingSink::default());
        let mut session = QuizSession::new("science", science(), SessionOptions::default())
            .with_reporting(None, sink.clone());
        session.start();
        session.select_answer("s1", "Au");
        assert_eq!(session.complete().unwrap().score, 50);
        session.settle().await;
        assert_eq!(sink.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_submission_keeps_outcome() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let mut session = QuizSession::new("science", science(), SessionOptions::default())
            .with_reporting(Some(&demo_user()), sink.clone());
        session.start();
        session.select_answer("s1", "Au");
        session.select_answer("s2", "Mars");
        session.complete();
        session.settle().await;

        assert_eq!(sink.count(), 1);
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.outcome().unwrap().score, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn load_unknown_category_fails() {
        let source = FixedSource {
            questions: science(),
            delay: Duration::from_millis(1000),
        };
        let err = QuizSession::load(&source, "nonexistent", SessionOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn load_returns_unstarted_session() {
        let source = FixedSource {
            questions: science(),
            delay: Duration::from_millis(1000),
        };
        let session = QuizSession::load(&source, "science", SessionOptions::default())
            .await
            .unwrap();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.question_count(), 2);
        assert_eq!(session.current_question().unwrap().id, "s1");
        assert_eq!(session.progress_percent(), 50);
        assert!(session.review().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_load_is_harmless() {
        let source = FixedSource {
            questions: science(),
            delay: Duration::from_secs(10),
        };
        let abandoned = tokio::time::timeout(
            Duration::from_secs(1),
            QuizSession::load(&source, "science", SessionOptions::default()),
        )
        .await;
        assert!(abandoned.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn review_exposes_answer_keys_after_completion() {
        let mut session = running(science());
        session.complete();
        let review = session.review().unwrap();
        assert_eq!(review[1].correct_answer.as_deref(), Some("Mars"));
    }
}
