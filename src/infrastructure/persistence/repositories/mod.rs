mod in_memory_repository;
mod pg_extraction_repository;

pub use in_memory_repository::InMemoryExtractionRepository;
pub use pg_extraction_repository::PgExtractionRepository;
