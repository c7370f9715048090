//! Modern slide decks (.pptx): an OOXML zip with one XML part per slide.
//!
//! Text lives in `p:sp` shapes as `a:p` paragraphs of `a:t` runs. Each shape
//! with a text body contributes one block; paragraphs inside it are joined by
//! newlines.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::types::{DocumentReader, SourceKind};
use super::ExtractionError;

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const SLIDE_SUFFIX: &str = ".xml";

pub struct PptxReader;

impl DocumentReader for PptxReader {
    fn kind(&self) -> SourceKind {
        SourceKind::Pptx
    }

    fn read_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ExtractionError::PresentationParsing(e.to_string()))?;

        let slides = slide_part_names(archive.file_names());
        tracing::debug!(slide_count = slides.len(), "PPTX slides found");

        let mut blocks = Vec::new();
        for (_, name) in slides {
            let mut xml = String::new();
            archive
                .by_name(&name)
                .map_err(|e| ExtractionError::PresentationParsing(e.to_string()))?
                .read_to_string(&mut xml)?;
            blocks.extend(shape_texts(&xml)?);
        }

        Ok(blocks.join("\n"))
    }
}

/// Slide part names sorted by slide number (slide2 before slide10).
fn slide_part_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<(u32, String)> {
    let mut slides: Vec<(u32, String)> = names
        .filter_map(|name| {
            let number = name
                .strip_prefix(SLIDE_PREFIX)?
                .strip_suffix(SLIDE_SUFFIX)?
                .parse::<u32>()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);
    slides
}

/// Text of every text-bearing shape on one slide, in document order.
pub fn shape_texts(slide_xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(slide_xml);

    let mut shapes = Vec::new();
    let mut shape_depth = 0usize;
    let mut has_text_body = false;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut in_text_run = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractionError::PresentationParsing(e.to_string()))?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sp" => {
                    if shape_depth == 0 {
                        has_text_body = false;
                        paragraphs.clear();
                    }
                    shape_depth += 1;
                }
                b"txBody" if shape_depth > 0 => has_text_body = true,
                b"p" if shape_depth > 0 => paragraph.clear(),
                b"t" if shape_depth > 0 => in_text_run = true,
                _ => {}
            },
            Event::Empty(e) => {
                if shape_depth > 0 && e.local_name().as_ref() == b"br" {
                    paragraph.push('\n');
                }
            }
            Event::Text(t) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::PresentationParsing(e.to_string()))?;
                paragraph.push_str(&text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" if shape_depth > 0 => paragraphs.push(std::mem::take(&mut paragraph)),
                b"sp" if shape_depth > 0 => {
                    shape_depth -= 1;
                    if shape_depth == 0 && has_text_body {
                        let text = paragraphs.join("\n");
                        if !text.trim().is_empty() {
                            shapes.push(text);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}
