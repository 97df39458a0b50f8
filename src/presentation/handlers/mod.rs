mod extract;
mod extraction_list;
mod extraction_status;
mod health;
mod responses;

pub use extract::{extract_handler, USER_ID_HEADER};
pub use extraction_list::list_extractions_handler;
pub use extraction_status::extraction_status_handler;
pub use health::health_handler;
pub use responses::{ClauseResponse, ErrorResponse, ExtractionResponse};
