use std::fmt;

use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Where the quiz text comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Pdf,
    Pptx,
    Ppt,
    WebPage,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Pptx => "pptx",
            Self::Ppt => "ppt",
            Self::WebPage => "web_page",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "PDF"),
            Self::Pptx | Self::Ppt => write!(f, "presentation"),
            Self::WebPage => write!(f, "web page"),
        }
    }
}

/// Input to the pipeline: an uploaded document or a URL, never both.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Upload { filename: String, bytes: Vec<u8> },
    Url(String),
}

impl DocumentSource {
    pub fn upload(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Upload {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Short description for logs (never the payload).
    pub fn describe(&self) -> String {
        match self {
            Self::Upload { filename, bytes } => format!("{filename} ({} bytes)", bytes.len()),
            Self::Url(url) => url.clone(),
        }
    }
}

/// Plain text pulled out of one document or page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub kind: SourceKind,
    pub text: String,
    /// Length of `text` in characters (not bytes).
    pub char_count: usize,
}

impl ExtractionResult {
    pub fn new(kind: SourceKind, text: String) -> Self {
        let char_count = text.chars().count();
        Self {
            kind,
            text,
            char_count,
        }
    }
}

/// Format-specific reader over an in-memory document.
pub trait DocumentReader {
    fn kind(&self) -> SourceKind;

    fn read_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Fetches a web page body (allows mocking the network in tests).
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, ExtractionError>;
}

/// Main extraction trait used by the pipeline
pub trait TextExtractor {
    fn extract(&self, source: &DocumentSource) -> Result<ExtractionResult, ExtractionError>;
}
