use serde_json::Value;

use super::types::Question;
use super::validation::{validate_quiz_value, ValidatedQuiz};
use super::ParseError;

/// How much raw model output to keep in debug logs.
const RAW_LOG_PREVIEW_CHARS: usize = 500;

/// Parse the model's raw text into validated questions, in model order.
pub fn parse_quiz_response(response: &str) -> Result<Vec<Question>, ParseError> {
    parse_quiz_response_with_report(response).map(|quiz| quiz.questions)
}

/// Like [`parse_quiz_response`], but keeps the validation warnings.
pub fn parse_quiz_response_with_report(response: &str) -> Result<ValidatedQuiz, ParseError> {
    let candidate = locate_json_array(response);

    let value: Value = serde_json::from_str(candidate).map_err(|e| {
        tracing::debug!(
            error = %e,
            raw = %preview(response),
            "Quiz response is not valid JSON"
        );
        ParseError::Malformed(e.to_string())
    })?;

    validate_quiz_value(value)
}

/// Find the JSON array in the model output.
///
/// Models sometimes wrap the array in prose or code fences despite being
/// told not to. Prefer the span from the first `[` to the last `]`; if there
/// is no such span, strip code fences and hope for the best.
pub fn locate_json_array(response: &str) -> &str {
    let trimmed = response.trim();

    if let (Some(start), Some(end)) = (trimmed.find('['), trimmed.rfind(']')) {
        if start < end {
            return &trimmed[start..=end];
        }
    }

    strip_code_fences(trimmed)
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` fence and a trailing ```` ``` ````.
pub fn strip_code_fences(text: &str) -> &str {
    let mut out = text.trim();
    if let Some(rest) = out.strip_prefix("```") {
        out = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
    }
    if let Some(rest) = out.strip_suffix("```") {
        out = rest;
    }
    out.trim()
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(RAW_LOG_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::quiz::types::DEFAULT_EXPLANATION;
    use crate::pipeline::quiz::QuestionDefect;

    const TWO_QUESTIONS: &str = r#"[
  {"question": "What is the powerhouse of the cell?", "options": ["Nucleus", "Mitochondrion", "Ribosome", "Golgi"], "correctAnswer": 1, "explanation": "Mitochondria make ATP."},
  {"question": "Which gas do plants absorb?", "options": ["Oxygen", "Nitrogen", "Carbon dioxide", "Helium"], "correctAnswer": 2}
]"#;

    #[test]
    fn parses_plain_array() {
        let questions = parse_quiz_response(TWO_QUESTIONS).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "What is the powerhouse of the cell?");
        assert_eq!(questions[0].explanation, "Mitochondria make ATP.");
        assert_eq!(questions[1].correct_answer, 2);
        assert_eq!(questions[1].explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn round_trip_preserves_structure_and_order() {
        let questions = parse_quiz_response(TWO_QUESTIONS).unwrap();
        let reparsed: Value = serde_json::to_value(&questions).unwrap();
        let original: Value = serde_json::from_str(TWO_QUESTIONS).unwrap();

        for (out, inp) in reparsed.as_array().unwrap().iter().zip(original.as_array().unwrap()) {
            assert_eq!(out["question"], inp["question"]);
            assert_eq!(out["options"], inp["options"]);
            assert_eq!(out["correctAnswer"], inp["correctAnswer"]);
        }
        assert_eq!(reparsed[0]["explanation"], original[0]["explanation"]);
        assert_eq!(reparsed[1]["explanation"], DEFAULT_EXPLANATION);
    }

    #[test]
    fn fenced_array_matches_plain() {
        let plain = parse_quiz_response(TWO_QUESTIONS).unwrap();
        let fenced = format!("```json\n{TWO_QUESTIONS}\n```");
        assert_eq!(parse_quiz_response(&fenced).unwrap(), plain);
    }

    #[test]
    fn prose_wrapped_array_matches_plain() {
        let plain = parse_quiz_response(TWO_QUESTIONS).unwrap();
        let wrapped = format!(
            "Sure! Here is your quiz:\n\n{TWO_QUESTIONS}\n\nLet me know if you want more."
        );
        assert_eq!(parse_quiz_response(&wrapped).unwrap(), plain);
    }

    #[test]
    fn prose_and_fences_together() {
        let plain = parse_quiz_response(TWO_QUESTIONS).unwrap();
        let wrapped = format!("Here you go:\n```json\n{TWO_QUESTIONS}\n```\nEnjoy!");
        assert_eq!(parse_quiz_response(&wrapped).unwrap(), plain);
    }

    #[test]
    fn locate_prefers_bracket_span() {
        assert_eq!(locate_json_array("  text [1, 2] more "), "[1, 2]");
        assert_eq!(locate_json_array("```json\n[]\n```"), "[]");
    }

    #[test]
    fn locate_falls_back_to_fence_stripping() {
        assert_eq!(locate_json_array("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(locate_json_array("```\n{}\n```"), "{}");
        assert_eq!(locate_json_array("] backwards ["), "] backwards [");
    }

    #[test]
    fn fenced_object_is_not_an_array() {
        let err = parse_quiz_response("```json\n{\"question\": \"x\"}\n```").unwrap_err();
        assert_eq!(err, ParseError::NotAnArray);
    }

    #[test]
    fn garbage_is_malformed() {
        let err = parse_quiz_response("I cannot help with that.").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
        assert!(err.to_string().contains("fewer questions"));
    }

    #[test]
    fn truncated_output_is_malformed() {
        let cut = &TWO_QUESTIONS[..TWO_QUESTIONS.len() / 2];
        assert!(matches!(
            parse_quiz_response(cut),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn empty_array_reports_no_questions() {
        assert_eq!(parse_quiz_response("[]").unwrap_err(), ParseError::NoQuestions);
        assert_eq!(
            parse_quiz_response("```json\n[ ]\n```").unwrap_err(),
            ParseError::NoQuestions
        );
    }

    #[test]
    fn three_options_cites_option_count() {
        let raw = r#"[{"question": "Q?", "options": ["a", "b", "c"], "correctAnswer": 0}]"#;
        let err = parse_quiz_response(raw).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidQuestion {
                index: 1,
                defect: QuestionDefect::WrongOptionCount(3),
            }
        );
    }

    #[test]
    fn missing_correct_answer_names_one_based_index() {
        let raw = r#"[
            {"question": "A?", "options": ["1", "2", "3", "4"], "correctAnswer": 0},
            {"question": "B?", "options": ["1", "2", "3", "4"]}
        ]"#;
        let err = parse_quiz_response(raw).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidQuestion {
                index: 2,
                defect: QuestionDefect::MissingField("correctAnswer"),
            }
        );
    }

    #[test]
    fn report_carries_range_warnings() {
        let raw = r#"[{"question": "Q?", "options": ["a", "b", "c", "d"], "correctAnswer": 4}]"#;
        let quiz = parse_quiz_response_with_report(raw).unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.warnings.len(), 1);
    }

    #[test]
    fn strip_fences_handles_bare_text() {
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
        assert_eq!(strip_code_fences("```JSON\n[2]\n```"), "[2]");
    }

    #[test]
    fn preview_truncates_long_output() {
        let long = "x".repeat(RAW_LOG_PREVIEW_CHARS + 10);
        assert!(preview(&long).ends_with('…'));
        assert_eq!(preview("short"), "short");
    }
}
