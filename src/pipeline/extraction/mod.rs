pub mod types;
pub mod format;
pub mod sanitize;
pub mod pdf;
pub mod pptx;
pub mod ppt;
pub mod web;
pub mod orchestrator;

pub use types::*;
pub use format::*;
pub use sanitize::*;
pub use pdf::*;
pub use pptx::*;
pub use ppt::*;
pub use web::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}. Upload a .pdf, .ppt or .pptx file")]
    UnsupportedFormat(String),

    #[error("Could not process the PDF file: {0}")]
    PdfParsing(String),

    #[error("Could not process the PowerPoint file: {0}")]
    PresentationParsing(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to fetch {url}: server responded with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Could not extract any meaningful text from the {0}")]
    NoMeaningfulText(SourceKind),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
