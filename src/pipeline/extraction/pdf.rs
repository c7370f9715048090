use super::types::{DocumentReader, SourceKind};
use super::ExtractionError;

/// PDF text reader using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned pages yield nothing.
pub struct PdfReader;

impl PdfReader {
    /// Per-page text, in page order.
    pub fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))
    }
}

impl DocumentReader for PdfReader {
    fn kind(&self) -> SourceKind {
        SourceKind::Pdf
    }

    fn read_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let pages = self.page_texts(bytes)?;
        tracing::debug!(page_count = pages.len(), "PDF pages read");
        Ok(pages.join("\n"))
    }
}
