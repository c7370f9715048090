use std::path::Path;

use super::types::SourceKind;
use super::ExtractionError;

/// OLE2 compound file signature (legacy .ppt, .doc, .xls)
pub const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Pick the extractor from the declared filename's extension.
pub fn kind_from_filename(filename: &str) -> Result<SourceKind, ExtractionError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => Ok(SourceKind::Pdf),
        "pptx" => Ok(SourceKind::Pptx),
        "ppt" => Ok(SourceKind::Ppt),
        _ => Err(ExtractionError::UnsupportedFormat(if ext.is_empty() {
            filename.to_string()
        } else {
            format!(".{ext}")
        })),
    }
}

/// Guess the container type from magic bytes, if recognizable.
pub fn sniff_kind(bytes: &[u8]) -> Option<SourceKind> {
    if bytes.starts_with(PDF_MAGIC) {
        Some(SourceKind::Pdf)
    } else if bytes.starts_with(ZIP_MAGIC) {
        Some(SourceKind::Pptx)
    } else if bytes.starts_with(&OLE_MAGIC) {
        Some(SourceKind::Ppt)
    } else {
        None
    }
}

/// Resolve the extractor for an upload. The extension decides; a magic-byte
/// mismatch is only logged, since the extractor will report its own failure.
pub fn detect_upload_kind(filename: &str, bytes: &[u8]) -> Result<SourceKind, ExtractionError> {
    let declared = kind_from_filename(filename)?;
    if let Some(sniffed) = sniff_kind(bytes) {
        if sniffed != declared {
            tracing::warn!(
                filename,
                declared = declared.as_str(),
                sniffed = sniffed.as_str(),
                "File extension does not match content"
            );
        }
    }
    Ok(declared)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_to_kinds() {
        assert_eq!(kind_from_filename("notes.pdf").unwrap(), SourceKind::Pdf);
        assert_eq!(kind_from_filename("deck.pptx").unwrap(), SourceKind::Pptx);
        assert_eq!(kind_from_filename("old.ppt").unwrap(), SourceKind::Ppt);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(kind_from_filename("LECTURE.PDF").unwrap(), SourceKind::Pdf);
        assert_eq!(kind_from_filename("Deck.PpTx").unwrap(), SourceKind::Pptx);
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = kind_from_filename("essay.docx").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ref e) if e == ".docx"));
    }

    #[test]
    fn missing_extension_rejected() {
        let err = kind_from_filename("README").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ref e) if e == "README"));
    }

    #[test]
    fn sniff_recognizes_magic_bytes() {
        assert_eq!(sniff_kind(b"%PDF-1.4 ..."), Some(SourceKind::Pdf));
        assert_eq!(sniff_kind(b"PK\x03\x04rest"), Some(SourceKind::Pptx));
        assert_eq!(sniff_kind(&OLE_MAGIC), Some(SourceKind::Ppt));
        assert_eq!(sniff_kind(b"hello"), None);
    }

    #[test]
    fn mismatch_still_uses_extension() {
        let kind = detect_upload_kind("slides.pptx", b"%PDF-1.7").unwrap();
        assert_eq!(kind, SourceKind::Pptx);
    }
}
