use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use thiserror::Error;

use crate::config::Settings;
use crate::grading::grade_attempt;
use crate::pipeline::extraction::DocumentSource;
use crate::pipeline::generation::{GeminiClient, GenerationError, QuestionCount, QuestionCountError};
use crate::pipeline::processor::{PipelineError, QuizGenerator, QuizOptions};
use crate::pipeline::quiz::{validate_quiz_value, Question};
use crate::time_estimation::estimate_generation_time;

#[derive(Parser, Debug)]
#[command(name = "quizgen")]
#[command(version, about = "Generate multiple-choice quizzes from documents and web pages")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a quiz from a PDF/PPT/PPTX file or a web page
    Generate(GenerateArgs),
    /// Print the expected generation time
    Estimate {
        /// Characters of source text
        #[arg(long)]
        chars: usize,
        /// Number of questions
        #[arg(short = 'n', long = "count", default_value = "")]
        count: String,
    },
    /// Score answers against a saved quiz
    Grade {
        /// Quiz JSON (output of `generate`, or a bare question array)
        quiz: PathBuf,
        /// Comma-separated 0-based option indexes; `-` leaves a question unanswered
        #[arg(short, long)]
        answers: String,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Document to quiz from
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    pub file: Option<PathBuf>,
    /// Web page to quiz from
    #[arg(long)]
    pub url: Option<String>,
    /// Number of questions (1-50, default 5)
    #[arg(short = 'n', long = "count", default_value = "")]
    pub count: String,
    /// Extra instructions for the quiz author
    #[arg(short, long)]
    pub instructions: Option<String>,
    /// Quiz title (defaults to the filename or URL host)
    #[arg(short, long)]
    pub title: Option<String>,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Nothing to quiz from: give a file or --url")]
    NoSource,

    #[error("Invalid quiz file: {0}")]
    QuizFile(String),

    #[error("Invalid answer '{0}': use a 0-based option index or '-'")]
    Answer(String),

    #[error("Could not write output: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<GenerationError> for CliError {
    fn from(e: GenerationError) -> Self {
        Self::Pipeline(e.into())
    }
}

impl From<QuestionCountError> for CliError {
    fn from(e: QuestionCountError) -> Self {
        Self::Pipeline(e.into())
    }
}

pub fn execute(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Estimate { chars, count } => {
            let count = QuestionCount::parse(&count)?;
            let estimate = estimate_generation_time(chars, count.get());
            println!("{}", estimate.label());
            Ok(())
        }
        Command::Grade { quiz, answers } => grade(&quiz, &answers),
    }
}

fn generate(args: GenerateArgs) -> Result<(), CliError> {
    let options = QuizOptions {
        question_count: QuestionCount::parse(&args.count)?,
        custom_instructions: args.instructions,
        title: args.title,
    };

    let source = match (args.file, args.url) {
        (Some(path), _) => {
            let bytes = read_file(&path)?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            DocumentSource::upload(filename, bytes)
        }
        (None, Some(url)) => DocumentSource::url(url),
        (None, None) => return Err(CliError::NoSource),
    };

    let settings = Settings::from_env();
    let client = GeminiClient::from_settings(&settings)?;
    let generator = QuizGenerator::with_client(Box::new(client))?;

    let quiz = generator.generate(&source, &options)?;
    println!("{}", serde_json::to_string_pretty(&quiz)?);
    Ok(())
}

fn grade(quiz_path: &Path, answers: &str) -> Result<(), CliError> {
    let raw = read_file(quiz_path)?;
    let questions = questions_from_json(&raw)?;
    let answers = parse_answers(answers)?;

    let result = grade_attempt(&questions, &answers);
    println!("{}", result.summary());
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Accepts a generated quiz object or a bare array of questions. Saved
/// quizzes go through the same validation as fresh model output, so older
/// files without explanations still load.
pub fn questions_from_json(raw: &[u8]) -> Result<Vec<Question>, CliError> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| CliError::QuizFile(e.to_string()))?;
    let questions = match value {
        Value::Object(mut fields) => fields
            .remove("questions")
            .ok_or_else(|| CliError::QuizFile("missing \"questions\"".into()))?,
        other => other,
    };
    validate_quiz_value(questions)
        .map(|quiz| quiz.questions)
        .map_err(|e| CliError::QuizFile(e.to_string()))
}

pub fn parse_answers(raw: &str) -> Result<Vec<Option<usize>>, CliError> {
    raw.split(',')
        .map(str::trim)
        .map(|item| match item {
            "-" | "" => Ok(None),
            n => n
                .parse::<usize>()
                .map(Some)
                .map_err(|_| CliError::Answer(n.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::quiz::DEFAULT_EXPLANATION;

    const QUIZ: &str = r#"{"title": "t", "questions": [
        {"question": "Q1", "options": ["a","b","c","d"], "correctAnswer": 1, "explanation": "e"}
    ]}"#;

    #[test]
    fn generate_requires_a_source() {
        assert!(Cli::try_parse_from(["quizgen", "generate"]).is_err());
        assert!(Cli::try_parse_from(["quizgen", "generate", "a.pdf", "--url", "https://x.org"]).is_err());
    }

    #[test]
    fn generate_parses_file_and_options() {
        let cli = Cli::try_parse_from([
            "quizgen", "generate", "notes.pdf", "-n", "3", "-i", "Focus on dates",
        ])
        .unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.file, Some(PathBuf::from("notes.pdf")));
                assert_eq!(args.count, "3");
                assert_eq!(args.instructions.as_deref(), Some("Focus on dates"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn generate_accepts_url() {
        let cli = Cli::try_parse_from(["quizgen", "generate", "--url", "https://example.com"])
            .unwrap();
        assert!(matches!(cli.command, Command::Generate(GenerateArgs { url: Some(_), .. })));
    }

    #[test]
    fn estimate_rejects_bad_count() {
        let cli = Cli::try_parse_from(["quizgen", "estimate", "--chars", "100", "-n", "0"])
            .unwrap();
        let err = execute(cli).unwrap_err();
        assert!(matches!(
            err,
            CliError::Pipeline(PipelineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn answers_parse_with_skips() {
        assert_eq!(parse_answers("1, -,3").unwrap(), vec![Some(1), None, Some(3)]);
        assert!(matches!(parse_answers("1,b"), Err(CliError::Answer(_))));
    }

    #[test]
    fn quiz_file_object_or_array() {
        let from_object = questions_from_json(QUIZ.as_bytes()).unwrap();
        assert_eq!(from_object.len(), 1);
        assert_eq!(from_object[0].correct_answer, 1);

        let array = r#"[{"question": "Q", "options": ["a","b","c","d"], "correctAnswer": 0, "explanation": "x"}]"#;
        assert_eq!(questions_from_json(array.as_bytes()).unwrap().len(), 1);

        assert!(matches!(
            questions_from_json(b"{\"title\": \"t\"}"),
            Err(CliError::QuizFile(_))
        ));
    }

    #[test]
    fn quiz_file_without_explanations_gets_default() {
        let legacy = br#"[{"question":"Q1","options":["a","b","c","d"],"correctAnswer":1}]"#;
        let questions = questions_from_json(legacy).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn quiz_file_with_wrong_option_count_rejected() {
        let one_option = br#"[{"question":"Q1","options":["a"],"correctAnswer":0}]"#;
        let err = questions_from_json(one_option).unwrap_err();
        assert!(matches!(err, CliError::QuizFile(_)));
        assert!(err.to_string().contains("expected 4 options, found 1"));
    }

    #[test]
    fn grade_reads_quiz_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.json");
        std::fs::write(&path, QUIZ).unwrap();
        assert!(grade(&path, "1").is_ok());
        assert!(matches!(
            grade(&dir.path().join("missing.json"), "1"),
            Err(CliError::Read { .. })
        ));
    }
}
