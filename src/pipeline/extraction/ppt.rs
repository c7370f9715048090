//! Legacy binary slide decks (.ppt).
//!
//! The file is an OLE2 compound document; slide text sits in the
//! `PowerPoint Document` stream as a tree of records. Every record starts
//! with an 8-byte little-endian header:
//!
//! | bytes | field                                             |
//! |-------|---------------------------------------------------|
//! | 0..2  | version (low 4 bits) and instance (high 12 bits)  |
//! | 2..4  | record type                                       |
//! | 4..8  | payload length                                    |
//!
//! Containers (version `0xF`) hold child records and are descended into.
//! Only two atom types carry text; everything else is skipped by length.

use std::io::{Cursor, Read};

use super::format::OLE_MAGIC;
use super::types::{DocumentReader, SourceKind};
use super::ExtractionError;

const DOCUMENT_STREAM: &str = "/PowerPoint Document";

const RECORD_HEADER_LEN: usize = 8;
const CONTAINER_VERSION: u16 = 0x000F;

/// TextCharsAtom: UTF-16LE text.
pub const TEXT_CHARS_ATOM: u16 = 4000;
/// TextBytesAtom: Latin-1 text (high byte of each UTF-16 unit dropped).
pub const TEXT_BYTES_ATOM: u16 = 4008;

pub struct PptReader;

impl DocumentReader for PptReader {
    fn kind(&self) -> SourceKind {
        SourceKind::Ppt
    }

    fn read_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let stream = if bytes.starts_with(&OLE_MAGIC) {
            read_document_stream(bytes)?
        } else {
            // Already a bare record stream (e.g. carved out by the caller).
            bytes.to_vec()
        };
        Ok(scan_text_records(&stream).join("\n"))
    }
}

fn read_document_stream(bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let mut compound = cfb::CompoundFile::open(Cursor::new(bytes))
        .map_err(|e| ExtractionError::PresentationParsing(e.to_string()))?;
    let mut stream = compound.open_stream(DOCUMENT_STREAM).map_err(|e| {
        ExtractionError::PresentationParsing(format!("missing PowerPoint Document stream: {e}"))
    })?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    Ok(data)
}

/// Walk the record stream and collect the text of every text atom, in
/// stream order. Undecodable atoms are skipped; a record whose declared
/// length runs past the end of the stream ends the scan.
pub fn scan_text_records(stream: &[u8]) -> Vec<String> {
    let mut texts = Vec::new();
    let mut pos = 0usize;

    while pos + RECORD_HEADER_LEN <= stream.len() {
        let ver_instance = u16::from_le_bytes([stream[pos], stream[pos + 1]]);
        let rec_type = u16::from_le_bytes([stream[pos + 2], stream[pos + 3]]);
        let rec_len = u32::from_le_bytes([
            stream[pos + 4],
            stream[pos + 5],
            stream[pos + 6],
            stream[pos + 7],
        ]) as usize;
        let body_start = pos + RECORD_HEADER_LEN;

        if ver_instance & 0x000F == CONTAINER_VERSION {
            pos = body_start;
            continue;
        }

        let Some(body_end) = body_start.checked_add(rec_len).filter(|end| *end <= stream.len())
        else {
            tracing::debug!(offset = pos, rec_type, rec_len, "Truncated PPT record, stopping scan");
            break;
        };
        let body = &stream[body_start..body_end];

        let decoded = match rec_type {
            TEXT_CHARS_ATOM => decode_utf16le(body),
            TEXT_BYTES_ATOM => Some(decode_latin1(body)),
            _ => None,
        };
        if let Some(text) = decoded {
            let text = text.replace('\r', "\n");
            let text = text.trim();
            if !text.is_empty() {
                texts.push(text.to_string());
            }
        }

        pos = body_end;
    }

    texts
}

fn decode_utf16le(body: &[u8]) -> Option<String> {
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    match String::from_utf16(&units) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!(error = %e, "Skipping undecodable TextCharsAtom");
            None
        }
    }
}

fn decode_latin1(body: &[u8]) -> String {
    body.iter().map(|&b| char::from(b)).collect()
}
