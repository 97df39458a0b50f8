use async_trait::async_trait;

use crate::application::ports::{TextExtractor, TextExtractorError};
use crate::domain::FileType;

use super::{DocxAdapter, PdfAdapter, PlainTextAdapter};

/// Dispatches to the adapter for the declared file type and enforces the
/// extracted-text size ceiling. Oversized documents fail outright instead
/// of being truncated, since truncation would silently drop clauses.
pub struct CompositeExtractor {
    pdf: PdfAdapter,
    docx: DocxAdapter,
    plain_text: PlainTextAdapter,
    max_text_chars: usize,
}

impl CompositeExtractor {
    pub fn new(max_text_chars: usize) -> Self {
        Self {
            pdf: PdfAdapter::new(),
            docx: DocxAdapter::new(),
            plain_text: PlainTextAdapter,
            max_text_chars,
        }
    }
}

#[async_trait]
impl TextExtractor for CompositeExtractor {
    async fn extract_text(
        &self,
        data: &[u8],
        file_type: FileType,
    ) -> Result<String, TextExtractorError> {
        let text = match file_type {
            FileType::Pdf => self.pdf.extract_text(data, file_type).await?,
            FileType::Docx => self.docx.extract_text(data, file_type).await?,
            FileType::Txt => self.plain_text.extract_text(data, file_type).await?,
        };

        let chars = text.chars().count();
        if chars > self.max_text_chars {
            return Err(TextExtractorError::DocumentTooLarge {
                chars,
                limit: self.max_text_chars,
            });
        }

        Ok(text)
    }
}
