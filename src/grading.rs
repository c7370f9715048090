//! Scoring a learner's attempt at a generated quiz.

use serde::Serialize;

use crate::pipeline::quiz::Question;

/// Outcome of one question in an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionFeedback {
    /// 1-based, as shown to the learner.
    pub number: usize,
    pub question: String,
    pub chosen: Option<usize>,
    pub chosen_text: Option<String>,
    pub correct_answer: usize,
    pub correct_text: Option<String>,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptResult {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub feedback: Vec<QuestionFeedback>,
}

impl AttemptResult {
    pub fn summary(&self) -> String {
        format!("You scored {} out of {}!", self.score, self.total)
    }
}

/// Grade `answers` against `questions`, position by position.
///
/// `None` means the question was left unanswered. Missing trailing answers
/// count as unanswered; extra answers are ignored.
pub fn grade_attempt(questions: &[Question], answers: &[Option<usize>]) -> AttemptResult {
    let feedback: Vec<QuestionFeedback> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let chosen = answers.get(i).copied().flatten();
            QuestionFeedback {
                number: i + 1,
                question: q.question.clone(),
                chosen,
                chosen_text: chosen.and_then(|c| q.options.get(c).cloned()),
                correct_answer: q.correct_answer,
                correct_text: q.correct_option().map(str::to_string),
                is_correct: chosen == Some(q.correct_answer),
                explanation: q.explanation.clone(),
            }
        })
        .collect();

    let score = feedback.iter().filter(|f| f.is_correct).count();
    let total = questions.len();
    let percentage = if total == 0 {
        0.0
    } else {
        (score as f64 / total as f64 * 1000.0).round() / 10.0
    };

    AttemptResult {
        score,
        total,
        percentage,
        feedback,
    }
}
