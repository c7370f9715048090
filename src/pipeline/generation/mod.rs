pub mod types;
pub mod prompt;
pub mod gemini;

pub use types::*;
pub use prompt::*;
pub use gemini::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Gemini API is not configured (set GEMINI_API_KEY)")]
    NotConfigured,

    #[error("Failed to communicate with the AI model: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("AI model request timed out after {0}s")]
    Timeout(u64),

    #[error("AI model returned an error (status {status}): {body}")]
    Provider { status: u16, body: String },

    #[error("Unexpected response from the AI model: {0}")]
    ResponseDecoding(String),

    #[error(
        "The AI returned an empty response. This may be due to safety filters or the input content.{}",
        blocked_suffix(.block_reason)
    )]
    EmptyResponse { block_reason: Option<String> },
}

fn blocked_suffix(block_reason: &Option<String>) -> String {
    match block_reason {
        Some(reason) => format!(" Blocked: {reason}."),
        None => String::new(),
    }
}

/// Invalid caller-supplied question count.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuestionCountError {
    #[error("Number of questions must be a whole number, got '{0}'")]
    NotANumber(String),

    #[error("Number of questions must be between {min} and {max}, got {value}")]
    OutOfRange { value: i64, min: u32, max: u32 },
}
