mod extraction_repository;
mod llm_client;
mod text_extractor;

pub use extraction_repository::{ExtractionRepository, Page, RepositoryError};
pub use llm_client::{LlmClient, LlmClientError};
pub use text_extractor::{TextExtractor, TextExtractorError};
