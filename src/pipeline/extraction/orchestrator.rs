use super::format::detect_upload_kind;
use super::pdf::PdfReader;
use super::ppt::PptReader;
use super::pptx::PptxReader;
use super::sanitize::{has_meaningful_text, sanitize_extracted_text};
use super::types::{
    DocumentReader, DocumentSource, ExtractionResult, PageFetcher, SourceKind, TextExtractor,
};
use super::web::{html_to_text, HttpPageFetcher};
use super::ExtractionError;

/// Dispatches a document or URL to the matching reader and cleans the result.
pub struct DocumentExtractor {
    fetcher: Box<dyn PageFetcher + Send + Sync>,
}

impl DocumentExtractor {
    pub fn new(fetcher: Box<dyn PageFetcher + Send + Sync>) -> Self {
        Self { fetcher }
    }

    /// Extractor using a real HTTP fetcher for URL sources.
    pub fn with_http() -> Result<Self, ExtractionError> {
        Ok(Self::new(Box::new(HttpPageFetcher::with_default_timeout()?)))
    }

    fn reader_for(kind: SourceKind) -> Option<&'static dyn DocumentReader> {
        match kind {
            SourceKind::Pdf => Some(&PdfReader),
            SourceKind::Pptx => Some(&PptxReader),
            SourceKind::Ppt => Some(&PptReader),
            SourceKind::WebPage => None,
        }
    }

    fn extract_upload(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(SourceKind, String), ExtractionError> {
        let kind = detect_upload_kind(filename, bytes)?;
        let reader = Self::reader_for(kind)
            .ok_or_else(|| ExtractionError::UnsupportedFormat(filename.to_string()))?;
        let raw = reader.read_text(bytes)?;
        Ok((kind, sanitize_extracted_text(&raw)))
    }

    fn extract_url(&self, url: &str) -> Result<(SourceKind, String), ExtractionError> {
        let html = self.fetcher.fetch(url)?;
        Ok((SourceKind::WebPage, html_to_text(&html)))
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract(&self, source: &DocumentSource) -> Result<ExtractionResult, ExtractionError> {
        let _span = tracing::info_span!("extract", source = %source.describe()).entered();

        let (kind, text) = match source {
            DocumentSource::Upload { filename, bytes } => self.extract_upload(filename, bytes)?,
            DocumentSource::Url(url) => self.extract_url(url)?,
        };

        if !has_meaningful_text(&text) {
            tracing::warn!(kind = kind.as_str(), "No meaningful text extracted");
            return Err(ExtractionError::NoMeaningfulText(kind));
        }

        let result = ExtractionResult::new(kind, text);
        tracing::info!(
            kind = kind.as_str(),
            text_chars = result.char_count,
            "Text extracted"
        );
        Ok(result)
    }
}

/// Page fetcher returning canned HTML (for tests and offline use).
pub struct StaticPageFetcher {
    html: String,
}

impl StaticPageFetcher {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
        }
    }
}

impl PageFetcher for StaticPageFetcher {
    fn fetch(&self, url: &str) -> Result<String, ExtractionError> {
        super::web::parse_page_url(url)?;
        Ok(self.html.clone())
    }
}
