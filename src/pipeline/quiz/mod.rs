pub mod types;
pub mod parser;
pub mod validation;

pub use types::*;
pub use parser::*;
pub use validation::*;

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "The AI returned a malformed response that could not be parsed as JSON ({0}). \
         Try again with fewer questions."
    )]
    Malformed(String),

    #[error("The AI response was not a JSON array of questions")]
    NotAnArray,

    #[error("No questions generated")]
    NoQuestions,

    #[error("Question {index}: {defect}")]
    InvalidQuestion { index: usize, defect: QuestionDefect },
}

/// What is wrong with one question object in the model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionDefect {
    NotAnObject,
    MissingField(&'static str),
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    WrongOptionCount(usize),
}

impl fmt::Display for QuestionDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "not a JSON object"),
            Self::MissingField(field) => write!(f, "missing \"{field}\""),
            Self::InvalidField { field, expected } => {
                write!(f, "\"{field}\" must be {expected}")
            }
            Self::WrongOptionCount(found) => {
                write!(f, "expected {OPTION_COUNT} options, found {found}")
            }
        }
    }
}
