use async_trait::async_trait;

use crate::domain::FileType;

/// Converts an uploaded file's raw bytes into plain text for the declared
/// type. Purely functional: identical bytes and type always produce
/// identical text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, data: &[u8], file_type: FileType)
        -> Result<String, TextExtractorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextExtractorError {
    #[error("no reasonable decoding found for text content")]
    UnsupportedEncoding,
    #[error("unreadable document: {0}")]
    UnreadableDocument(String),
    #[error("document text too large: {chars} chars exceeds limit of {limit}")]
    DocumentTooLarge { chars: usize, limit: usize },
}
