use serde::{Deserialize, Serialize};

/// Every question has exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

/// Placeholder for questions the model left unexplained.
pub const DEFAULT_EXPLANATION: &str = "No explanation provided.";

/// One validated multiple-choice question.
///
/// Serializes with the wire keys the frontend and stored quizzes use
/// (`question`, `options`, `correctAnswer`, `explanation`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// 0-based index into `options`. Not range-checked; see
    /// [`super::validation::ValidatedQuiz::warnings`].
    pub correct_answer: usize,
    pub explanation: String,
}

impl Question {
    /// Text of the correct option, if the index is in range.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }
}
