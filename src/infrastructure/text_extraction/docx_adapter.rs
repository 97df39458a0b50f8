use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::application::ports::{TextExtractor, TextExtractorError};
use crate::domain::FileType;

/// Extracts paragraph text from the `word/document.xml` part of a DOCX
/// archive, in document order, joined with newlines. Empty paragraphs are
/// skipped.
#[derive(Default)]
pub struct DocxAdapter;

impl DocxAdapter {
    pub fn new() -> Self {
        Self
    }

    fn extract_paragraphs(data: &[u8]) -> Result<String, TextExtractorError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| {
            TextExtractorError::UnreadableDocument(format!("failed to open DOCX archive: {e}"))
        })?;

        let mut document_xml = archive.by_name("word/document.xml").map_err(|e| {
            TextExtractorError::UnreadableDocument(format!("missing word/document.xml: {e}"))
        })?;

        let mut xml = String::new();
        document_xml.read_to_string(&mut xml).map_err(|e| {
            TextExtractorError::UnreadableDocument(format!("failed to read document.xml: {e}"))
        })?;

        parse_document_xml(&xml)
    }
}

#[async_trait]
impl TextExtractor for DocxAdapter {
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    async fn extract_text(
        &self,
        data: &[u8],
        _file_type: FileType,
    ) -> Result<String, TextExtractorError> {
        let owned = data.to_vec();
        let text = tokio::task::spawn_blocking(move || Self::extract_paragraphs(&owned))
            .await
            .map_err(|e| TextExtractorError::UnreadableDocument(format!("task join error: {e}")))??;

        tracing::info!(text_length = text.len(), "DOCX text extraction complete");

        Ok(text)
    }
}

fn parse_document_xml(xml: &str) -> Result<String, TextExtractorError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = true;
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    // Whitespace inside runs is significant; only the
                    // paragraph edges get trimmed.
                    let paragraph = std::mem::take(&mut current);
                    let trimmed = paragraph.trim();
                    if !trimmed.is_empty() {
                        paragraphs.push(trimmed.to_string());
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_run {
                    current.push_str(&e.xml_content().unwrap_or_default());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TextExtractorError::UnreadableDocument(format!(
                    "XML parsing error: {e}"
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paragraph_runs_in_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
                <w:p></w:p>
                <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>
            </w:body>
        </w:document>"#;

        let text = parse_document_xml(xml).unwrap();
        assert_eq!(text, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn keeps_whitespace_at_run_boundaries_and_trims_paragraph_edges() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p><w:r><w:t> Limitation of </w:t></w:r><w:r><w:t>liability applies. </w:t></w:r></w:p>
            </w:body>
        </w:document>"#;

        let text = parse_document_xml(xml).unwrap();
        assert_eq!(text, "Limitation of liability applies.");
    }

    #[test]
    fn unescapes_xml_entities_in_run_text() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p><w:r><w:t>Buyer &amp; Seller</w:t></w:r></w:p>
            </w:body>
        </w:document>"#;

        let text = parse_document_xml(xml).unwrap();
        assert_eq!(text, "Buyer & Seller");
    }
}
