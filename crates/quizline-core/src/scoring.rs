//! Attempt scoring.

use crate::model::{Question, SelectedAnswers};

/// Correct-answer tally for a set of questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub correct: usize,
    pub total: usize,
}

impl Tally {
    /// Percentage score, rounded half up. Zero when there are no questions.
    pub fn percent(&self) -> u32 {
        percent(self.correct, self.total)
    }
}

/// Count the questions whose selected answer matches the answer key.
///
/// Unanswered questions count as incorrect.
pub fn tally(questions: &[Question], answers: &SelectedAnswers) -> Tally {
    let correct = questions
        .iter()
        .filter(|q| q.is_correct(answers.get(&q.id).map(String::as_str)))
        .count();
    Tally {
        correct,
        total: questions.len(),
    }
}

/// `round(100 * correct / total)` in integer arithmetic, or 0 for `total == 0`.
pub fn percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    ((200 * correct + total) / (2 * total)) as u32
}
