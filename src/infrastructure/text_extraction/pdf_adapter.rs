use async_trait::async_trait;
use lopdf::Document;

use crate::application::ports::{TextExtractor, TextExtractorError};
use crate::domain::FileType;

use super::text_sanitizer::sanitize_extracted_text;

const PAGE_SEPARATOR: &str = "\n\n";

/// Extracts the text layer of a PDF page by page in document order.
/// A structurally valid PDF whose pages carry no text layer (a scanned
/// document) yields an empty result rather than an error; OCR is not
/// part of this pipeline.
#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(data: &[u8]) -> Result<Vec<String>, TextExtractorError> {
        let doc = Document::load_mem(data).map_err(|e| {
            TextExtractorError::UnreadableDocument(format!("failed to parse PDF: {e}"))
        })?;

        let mut pages = Vec::new();
        for (page_number, _) in doc.get_pages() {
            let text = doc.extract_text(&[page_number]).unwrap_or_default();
            let sanitized = sanitize_extracted_text(&text);
            if !sanitized.is_empty() {
                pages.push(sanitized);
            }
        }

        Ok(pages)
    }
}

#[async_trait]
impl TextExtractor for PdfAdapter {
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    async fn extract_text(
        &self,
        data: &[u8],
        _file_type: FileType,
    ) -> Result<String, TextExtractorError> {
        // lopdf parsing is CPU-bound; keep it off the async runtime.
        let owned = data.to_vec();
        let pages = tokio::task::spawn_blocking(move || Self::extract_pages(&owned))
            .await
            .map_err(|e| TextExtractorError::UnreadableDocument(format!("task join error: {e}")))??;

        tracing::info!(page_count = pages.len(), "PDF text extraction complete");

        Ok(pages.join(PAGE_SEPARATOR))
    }
}
