use super::types::QuestionCount;

/// Source text beyond this many characters is cut before prompting.
pub const MAX_SOURCE_CHARS: usize = 100_000;

/// Appended to source text that was cut at [`MAX_SOURCE_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n\n[... text truncated ...]";

pub const QUIZ_FORMAT_RULES: &str = r#"The response MUST be a valid JSON array and nothing else. Do not include any text, code block markers like ```json, or any other formatting before or after the JSON array.

Each object in the array must have these exact keys:
1. "question": A string for the question text.
2. "options": An array of exactly 4 strings representing the possible answers.
3. "correctAnswer": The 0-based index (0, 1, 2 or 3) of the correct answer within the "options" array.
4. "explanation": A short string explaining why the correct answer is right.

Example format:
[
  {"question": "What is the primary topic?", "options": ["A", "B", "C", "D"], "correctAnswer": 2, "explanation": "The text focuses on C."}
]"#;

pub const QUIZ_QUALITY_RULES: &str = r#"IMPORTANT: You must generate questions that test conceptual understanding of the topics presented in the text.
GOOD QUESTIONS are about: principles, concepts, mechanisms, definitions, properties, causes and effects, and applications.
BAD QUESTIONS (DO NOT ASK): Trivial questions about the document's structure, layout, or metadata. This includes questions about page numbers, section headings, slide or experiment numbers, assessment procedures, rubrics, or lists of content."#;

/// Everything the prompt needs. Built once per generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    source_text: String,
    question_count: QuestionCount,
    custom_instructions: Option<String>,
    truncated: bool,
}

impl GenerationRequest {
    /// Build a request, truncating the source text and dropping blank
    /// custom instructions.
    pub fn new(
        source_text: &str,
        question_count: QuestionCount,
        custom_instructions: Option<&str>,
    ) -> Self {
        let (source_text, truncated) = truncate_source_text(source_text);
        let custom_instructions = custom_instructions
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if truncated {
            tracing::info!(max_chars = MAX_SOURCE_CHARS, "Source text truncated for prompt");
        }

        Self {
            source_text,
            question_count,
            custom_instructions,
            truncated,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn question_count(&self) -> QuestionCount {
        self.question_count
    }

    pub fn custom_instructions(&self) -> Option<&str> {
        self.custom_instructions.as_deref()
    }

    pub fn was_truncated(&self) -> bool {
        self.truncated
    }
}

/// Cut text to [`MAX_SOURCE_CHARS`] characters (on a char boundary) and
/// append [`TRUNCATION_MARKER`]. Returns whether a cut happened.
pub fn truncate_source_text(text: &str) -> (String, bool) {
    match text.char_indices().nth(MAX_SOURCE_CHARS) {
        Some((byte_idx, _)) => {
            let mut cut = String::with_capacity(byte_idx + TRUNCATION_MARKER.len());
            cut.push_str(&text[..byte_idx]);
            cut.push_str(TRUNCATION_MARKER);
            (cut, true)
        }
        None => (text.to_string(), false),
    }
}

/// Build the quiz generation prompt.
pub fn build_quiz_prompt(request: &GenerationRequest) -> String {
    let count = request.question_count().get();

    let custom_section = match request.custom_instructions() {
        Some(instructions) => format!(
            "\n\nFollow these additional instructions when generating the quiz: {instructions}\n"
        ),
        None => String::new(),
    };

    format!(
        r#"Based on the following text, create a multiple-choice quiz with {count} questions.
{QUIZ_FORMAT_RULES}

{QUIZ_QUALITY_RULES}{custom_section}

Here is the text to analyze:
---
{source}
---
"#,
        source = request.source_text(),
    )
}
