use serde::{Deserialize, Serialize};

use super::{GenerationError, QuestionCountError};

/// Questions generated when the caller does not say.
pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const MIN_QUESTION_COUNT: u32 = 1;
/// Hard ceiling. Large counts make truncated model output much more likely.
pub const MAX_QUESTION_COUNT: u32 = 50;

/// Number of questions to request, always within
/// [`MIN_QUESTION_COUNT`]..=[`MAX_QUESTION_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionCount(u32);

impl QuestionCount {
    pub fn new(value: u32) -> Result<Self, QuestionCountError> {
        if (MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&value) {
            Ok(Self(value))
        } else {
            Err(QuestionCountError::OutOfRange {
                value: i64::from(value),
                min: MIN_QUESTION_COUNT,
                max: MAX_QUESTION_COUNT,
            })
        }
    }

    /// Parse the form-field value a web caller sends. Blank means default.
    pub fn parse(raw: &str) -> Result<Self, QuestionCountError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let value: i64 = trimmed
            .parse()
            .map_err(|_| QuestionCountError::NotANumber(trimmed.to_string()))?;
        let value = u32::try_from(value).map_err(|_| QuestionCountError::OutOfRange {
            value,
            min: MIN_QUESTION_COUNT,
            max: MAX_QUESTION_COUNT,
        })?;
        Self::new(value)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self(DEFAULT_QUESTION_COUNT)
    }
}

/// What the model said back.
///
/// `text` is absent when the provider returned no candidates, which usually
/// means the prompt was blocked; `block_reason` then says why, if known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: Option<String>,
    pub block_reason: Option<String>,
}

impl GenerationResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            block_reason: None,
        }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            text: None,
            block_reason: Some(reason.into()),
        }
    }

    /// The response text, or `EmptyResponse` if there is none worth parsing.
    pub fn into_text(self) -> Result<String, GenerationError> {
        match self.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(GenerationError::EmptyResponse {
                block_reason: self.block_reason,
            }),
        }
    }
}

/// LLM client abstraction (allows mocking)
pub trait LlmClient {
    fn generate(&self, prompt: &str) -> Result<GenerationResponse, GenerationError>;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str;
}
