mod extraction_service;
mod extraction_worker;
mod prompt_builder;
mod response_normalizer;

pub use extraction_service::{ExtractionMessage, ExtractionService, SubmitError};
pub use extraction_worker::{ExtractionFailure, ExtractionWorker};
pub use prompt_builder::{build_prompt, ExtractionPrompt};
pub use response_normalizer::{normalize_response, NormalizeError, NormalizedClause};
