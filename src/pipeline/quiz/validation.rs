// Structural validation of model-produced quiz JSON.
// Rejects anything the quiz UI cannot render; fills the explanation default
// for older prompt variants; flags (but keeps) out-of-range answer indexes.

use serde_json::{Map, Value};

use super::types::{Question, DEFAULT_EXPLANATION, OPTION_COUNT};
use super::{ParseError, QuestionDefect};

/// Validated questions plus non-fatal findings.
#[derive(Debug, Clone)]
pub struct ValidatedQuiz {
    pub questions: Vec<Question>,
    pub warnings: Vec<String>,
}

/// Validate a parsed JSON value as a quiz.
///
/// Question indexes in errors and warnings are 1-based, as users count them.
pub fn validate_quiz_value(value: Value) -> Result<ValidatedQuiz, ParseError> {
    let Value::Array(items) = value else {
        return Err(ParseError::NotAnArray);
    };
    if items.is_empty() {
        return Err(ParseError::NoQuestions);
    }

    let mut warnings = Vec::new();
    let mut defaulted = 0usize;
    let mut questions = Vec::with_capacity(items.len());

    for (i, item) in items.into_iter().enumerate() {
        let index = i + 1;
        let invalid = |defect| ParseError::InvalidQuestion { index, defect };

        let Value::Object(fields) = item else {
            return Err(invalid(QuestionDefect::NotAnObject));
        };

        let question = validate_question_text(&fields).map_err(invalid)?;
        let options = validate_options(&fields).map_err(invalid)?;
        let correct_answer = validate_correct_answer(&fields).map_err(invalid)?;

        if correct_answer >= options.len() {
            warnings.push(format!(
                "Question {index}: correctAnswer {correct_answer} is outside the {} options",
                options.len()
            ));
        }

        let explanation = match explanation_text(&fields) {
            Some(text) => text,
            None => {
                defaulted += 1;
                DEFAULT_EXPLANATION.to_string()
            }
        };

        questions.push(Question {
            question,
            options,
            correct_answer,
            explanation,
        });
    }

    if defaulted > 0 {
        tracing::debug!(defaulted, "Questions without explanation given the default");
    }
    if !warnings.is_empty() {
        tracing::warn!(
            warning_count = warnings.len(),
            "Quiz validation warnings detected"
        );
    }

    Ok(ValidatedQuiz {
        questions,
        warnings,
    })
}

fn required<'a>(
    fields: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a Value, QuestionDefect> {
    fields.get(key).ok_or(QuestionDefect::MissingField(key))
}

fn validate_question_text(fields: &Map<String, Value>) -> Result<String, QuestionDefect> {
    match required(fields, "question")? {
        Value::String(text) => Ok(text.clone()),
        _ => Err(QuestionDefect::InvalidField {
            field: "question",
            expected: "a string",
        }),
    }
}

fn validate_options(fields: &Map<String, Value>) -> Result<Vec<String>, QuestionDefect> {
    let Value::Array(items) = required(fields, "options")? else {
        return Err(QuestionDefect::InvalidField {
            field: "options",
            expected: "an array",
        });
    };
    if items.len() != OPTION_COUNT {
        return Err(QuestionDefect::WrongOptionCount(items.len()));
    }

    items
        .iter()
        .map(|item| {
            scalar_text(item).ok_or(QuestionDefect::InvalidField {
                field: "options",
                expected: "an array of text values",
            })
        })
        .collect()
}

fn validate_correct_answer(fields: &Map<String, Value>) -> Result<usize, QuestionDefect> {
    required(fields, "correctAnswer")?
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(QuestionDefect::InvalidField {
            field: "correctAnswer",
            expected: "a non-negative integer",
        })
}

/// The explanation, or `None` when absent, null, or blank.
fn explanation_text(fields: &Map<String, Value>) -> Option<String> {
    fields
        .get("explanation")
        .and_then(scalar_text)
        .filter(|text| !text.trim().is_empty())
}

/// Strings as-is; numbers and booleans in their JSON spelling.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_item() -> Value {
        json!({
            "question": "Which organelle produces ATP?",
            "options": ["Nucleus", "Mitochondrion", "Ribosome", "Golgi"],
            "correctAnswer": 1,
            "explanation": "Mitochondria run oxidative phosphorylation."
        })
    }

    fn defect_of(result: Result<ValidatedQuiz, ParseError>) -> (usize, QuestionDefect) {
        match result {
            Err(ParseError::InvalidQuestion { index, defect }) => (index, defect),
            other => panic!("expected InvalidQuestion, got {other:?}"),
        }
    }

    #[test]
    fn valid_quiz_passes() {
        let quiz = validate_quiz_value(json!([valid_item()])).unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert!(quiz.warnings.is_empty());
        let q = &quiz.questions[0];
        assert_eq!(q.correct_answer, 1);
        assert_eq!(q.options[1], "Mitochondrion");
        assert_eq!(q.explanation, "Mitochondria run oxidative phosphorylation.");
    }

    #[test]
    fn non_array_rejected() {
        let result = validate_quiz_value(json!({"questions": [valid_item()]}));
        assert_eq!(result.unwrap_err(), ParseError::NotAnArray);
    }

    #[test]
    fn empty_array_rejected() {
        let err = validate_quiz_value(json!([])).unwrap_err();
        assert_eq!(err, ParseError::NoQuestions);
        assert_eq!(err.to_string(), "No questions generated");
    }

    #[test]
    fn non_object_item_rejected_with_index() {
        let (index, defect) = defect_of(validate_quiz_value(json!([valid_item(), "oops"])));
        assert_eq!(index, 2);
        assert_eq!(defect, QuestionDefect::NotAnObject);
    }

    #[test]
    fn missing_correct_answer_names_question() {
        let mut broken = valid_item();
        broken.as_object_mut().unwrap().remove("correctAnswer");
        let err = validate_quiz_value(json!([valid_item(), valid_item(), broken])).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidQuestion {
                index: 3,
                defect: QuestionDefect::MissingField("correctAnswer"),
            }
        );
        assert_eq!(err.to_string(), "Question 3: missing \"correctAnswer\"");
    }

    #[test]
    fn missing_question_and_options_reported() {
        let mut no_question = valid_item();
        no_question.as_object_mut().unwrap().remove("question");
        let (_, defect) = defect_of(validate_quiz_value(json!([no_question])));
        assert_eq!(defect, QuestionDefect::MissingField("question"));

        let mut no_options = valid_item();
        no_options.as_object_mut().unwrap().remove("options");
        let (_, defect) = defect_of(validate_quiz_value(json!([no_options])));
        assert_eq!(defect, QuestionDefect::MissingField("options"));
    }

    #[test]
    fn three_options_rejected() {
        let mut item = valid_item();
        item["options"] = json!(["A", "B", "C"]);
        let err = validate_quiz_value(json!([item])).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidQuestion {
                index: 1,
                defect: QuestionDefect::WrongOptionCount(3),
            }
        );
        assert_eq!(err.to_string(), "Question 1: expected 4 options, found 3");
    }

    #[test]
    fn five_options_rejected() {
        let mut item = valid_item();
        item["options"] = json!(["A", "B", "C", "D", "E"]);
        let (_, defect) = defect_of(validate_quiz_value(json!([item])));
        assert_eq!(defect, QuestionDefect::WrongOptionCount(5));
    }

    #[test]
    fn options_must_be_array() {
        let mut item = valid_item();
        item["options"] = json!("A, B, C, D");
        let (_, defect) = defect_of(validate_quiz_value(json!([item])));
        assert!(matches!(defect, QuestionDefect::InvalidField { field: "options", .. }));
    }

    #[test]
    fn numeric_options_become_text() {
        let mut item = valid_item();
        item["options"] = json!([1, 2.5, true, "four"]);
        let quiz = validate_quiz_value(json!([item])).unwrap();
        assert_eq!(quiz.questions[0].options, vec!["1", "2.5", "true", "four"]);
    }

    #[test]
    fn object_option_rejected() {
        let mut item = valid_item();
        item["options"] = json!(["A", {"text": "B"}, "C", "D"]);
        let (_, defect) = defect_of(validate_quiz_value(json!([item])));
        assert!(matches!(defect, QuestionDefect::InvalidField { field: "options", .. }));
    }

    #[test]
    fn correct_answer_must_be_non_negative_integer() {
        for bad in [json!(-1), json!("2"), json!(1.5), json!(null)] {
            let mut item = valid_item();
            item["correctAnswer"] = bad.clone();
            let (_, defect) = defect_of(validate_quiz_value(json!([item])));
            assert!(
                matches!(defect, QuestionDefect::InvalidField { field: "correctAnswer", .. }),
                "value {bad} gave {defect:?}"
            );
        }
    }

    #[test]
    fn out_of_range_answer_kept_with_warning() {
        let mut item = valid_item();
        item["correctAnswer"] = json!(7);
        let quiz = validate_quiz_value(json!([item])).unwrap();
        assert_eq!(quiz.questions[0].correct_answer, 7);
        assert_eq!(quiz.warnings.len(), 1);
        assert!(quiz.warnings[0].starts_with("Question 1:"));
    }

    #[test]
    fn missing_null_or_blank_explanation_defaulted() {
        let mut missing = valid_item();
        missing.as_object_mut().unwrap().remove("explanation");
        let mut null_expl = valid_item();
        null_expl["explanation"] = Value::Null;
        let mut blank = valid_item();
        blank["explanation"] = json!("  ");

        let quiz = validate_quiz_value(json!([missing, null_expl, blank, valid_item()])).unwrap();
        assert_eq!(quiz.questions[0].explanation, DEFAULT_EXPLANATION);
        assert_eq!(quiz.questions[1].explanation, DEFAULT_EXPLANATION);
        assert_eq!(quiz.questions[2].explanation, DEFAULT_EXPLANATION);
        assert_ne!(quiz.questions[3].explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn extra_keys_ignored() {
        let mut item = valid_item();
        item["difficulty"] = json!("hard");
        assert!(validate_quiz_value(json!([item])).is_ok());
    }
}
