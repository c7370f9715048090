//! Quiz generation orchestrator.
//!
//! Single entry point that drives the whole pipeline:
//! extract → build prompt → call LLM → parse and validate.
//!
//! Each stage returns its own error type; the first failure stops the run
//! and nothing partial is returned. Engines are injected as trait objects so
//! the pipeline runs against mocks in tests.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::extraction::{
    DocumentExtractor, DocumentSource, ExtractionError, ExtractionResult, SourceKind,
    TextExtractor,
};
use crate::pipeline::generation::{
    build_quiz_prompt, GenerationError, GenerationRequest, LlmClient, QuestionCount,
    QuestionCountError,
};
use crate::pipeline::quiz::{parse_quiz_response_with_report, ParseError, Question, ValidatedQuiz};
use crate::time_estimation::{estimate_generation_time, GenerationEstimate};

/// Title used when the source offers nothing better.
pub const UNTITLED_QUIZ: &str = "Untitled Quiz";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Everything that can stop a quiz from being generated.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidRequest(#[from] QuestionCountError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl PipelineError {
    /// Stage that failed, for logs and metrics labels.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "request",
            Self::Extraction(_) => "extraction",
            Self::Generation(_) => "generation",
            Self::Parse(_) => "parse",
        }
    }

    /// Whether asking the user to simply try again makes sense.
    /// Model output varies between calls; documents and inputs do not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Generation(e) => !matches!(e, GenerationError::NotConfigured),
            Self::Parse(_) => true,
            Self::Extraction(ExtractionError::Fetch { .. }) => true,
            Self::Extraction(ExtractionError::HttpStatus { status, .. }) => *status >= 500,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// Caller choices for one generation.
#[derive(Debug, Clone, Default)]
pub struct QuizOptions {
    pub question_count: QuestionCount,
    pub custom_instructions: Option<String>,
    /// Overrides the title derived from the source.
    pub title: Option<String>,
}

/// A freshly generated quiz, ready for the caller to store and render.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedQuiz {
    pub id: Uuid,
    pub title: String,
    pub questions: Vec<Question>,
    pub source_kind: SourceKind,
    pub source_chars: usize,
    pub source_truncated: bool,
    /// Non-fatal validation findings (e.g. answer index out of range).
    pub warnings: Vec<String>,
    pub estimate: GenerationEstimate,
    pub created_at: DateTime<Utc>,
}

/// Derive a quiz title from its source: the upload's filename, else the
/// URL's host.
pub fn quiz_title(source: &DocumentSource) -> String {
    let title = match source {
        DocumentSource::Upload { filename, .. } => Some(filename.trim().to_string()),
        DocumentSource::Url(url) => reqwest::Url::parse(url.trim())
            .ok()
            .and_then(|u| u.host_str().map(str::to_string)),
    };
    title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED_QUIZ.to_string())
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Orchestrates quiz generation: extract → prompt → generate → parse.
///
/// Stateless between calls apart from the injected engines, so one instance
/// can serve every request.
pub struct QuizGenerator {
    extractor: Box<dyn TextExtractor + Send + Sync>,
    llm: Box<dyn LlmClient + Send + Sync>,
}

impl QuizGenerator {
    pub fn new(
        extractor: Box<dyn TextExtractor + Send + Sync>,
        llm: Box<dyn LlmClient + Send + Sync>,
    ) -> Self {
        Self { extractor, llm }
    }

    /// Generator with the standard extractors and the given LLM client.
    pub fn with_client(llm: Box<dyn LlmClient + Send + Sync>) -> Result<Self, PipelineError> {
        Ok(Self::new(Box::new(DocumentExtractor::with_http()?), llm))
    }

    /// Stage 1: document or URL → plain text.
    pub fn extract(&self, source: &DocumentSource) -> Result<ExtractionResult, PipelineError> {
        Ok(self.extractor.extract(source)?)
    }

    /// Stages 2-4: text → prompt → model output → validated questions.
    pub fn generate_questions(
        &self,
        request: &GenerationRequest,
    ) -> Result<ValidatedQuiz, PipelineError> {
        let prompt = build_quiz_prompt(request);
        tracing::debug!(prompt_chars = prompt.chars().count(), "Prompt built");

        let started = Instant::now();
        let response = self.llm.generate(&prompt)?;
        tracing::info!(
            model = self.llm.model_name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "LLM call finished"
        );

        let text = response.into_text()?;
        Ok(parse_quiz_response_with_report(&text)?)
    }

    /// Full pipeline from a document or URL.
    pub fn generate(
        &self,
        source: &DocumentSource,
        options: &QuizOptions,
    ) -> Result<GeneratedQuiz, PipelineError> {
        let _span = tracing::info_span!(
            "generate_quiz",
            source = %source.describe(),
            question_count = options.question_count.get()
        )
        .entered();

        let result = self.run_stages(source, options);
        if let Err(e) = &result {
            tracing::warn!(stage = e.stage(), error = %e, "Quiz generation failed");
        }
        result
    }

    fn run_stages(
        &self,
        source: &DocumentSource,
        options: &QuizOptions,
    ) -> Result<GeneratedQuiz, PipelineError> {
        let extraction = self.extract(source)?;
        let estimate = estimate_generation_time(extraction.char_count, options.question_count.get());
        tracing::info!(estimate = %estimate.label(), "Generating quiz");

        let request = GenerationRequest::new(
            &extraction.text,
            options.question_count,
            options.custom_instructions.as_deref(),
        );
        let validated = self.generate_questions(&request)?;

        if validated.questions.len() != options.question_count.get() as usize {
            tracing::info!(
                requested = options.question_count.get(),
                received = validated.questions.len(),
                "Model returned a different number of questions than requested"
            );
        }

        let title = options
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| quiz_title(source));

        let quiz = GeneratedQuiz {
            id: Uuid::new_v4(),
            title,
            questions: validated.questions,
            source_kind: extraction.kind,
            source_chars: extraction.char_count,
            source_truncated: request.was_truncated(),
            warnings: validated.warnings,
            estimate,
            created_at: Utc::now(),
        };
        tracing::info!(
            quiz_id = %quiz.id,
            questions = quiz.questions.len(),
            "Quiz generated"
        );
        Ok(quiz)
    }
}
