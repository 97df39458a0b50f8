mod clause;
mod clause_type;
mod extraction_job;
mod file_type;
mod job_status;

pub use clause::{Clause, ClauseId};
pub use clause_type::ClauseType;
pub use extraction_job::{ExtractionJob, JobId, UserId};
pub use file_type::FileType;
pub use job_status::{InvalidTransition, JobStatus};
