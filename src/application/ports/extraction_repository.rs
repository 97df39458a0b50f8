use async_trait::async_trait;

use crate::domain::{Clause, ExtractionJob, JobId, UserId};

/// A page of jobs plus the total count for the owning user.
#[derive(Debug)]
pub struct Page {
    pub total: u64,
    pub jobs: Vec<ExtractionJob>,
}

/// Create/read/update-once access to jobs and batch insert for clauses.
/// `complete` must make the terminal status and the clause batch visible
/// together: a reader never observes a completed job with partial clauses.
#[async_trait]
pub trait ExtractionRepository: Send + Sync {
    async fn create_job(&self, job: &ExtractionJob) -> Result<(), RepositoryError>;

    async fn get_job(&self, id: JobId) -> Result<Option<ExtractionJob>, RepositoryError>;

    async fn get_clauses(&self, job_id: JobId) -> Result<Vec<Clause>, RepositoryError>;

    async fn list_jobs(
        &self,
        user_id: &UserId,
        skip: u64,
        limit: u64,
    ) -> Result<Page, RepositoryError>;

    /// Atomically inserts the clause batch and moves the job from
    /// `processing` to `completed`, recording success metadata.
    async fn complete_job(
        &self,
        id: JobId,
        clauses: &[Clause],
        extra_data: serde_json::Value,
    ) -> Result<(), RepositoryError>;

    /// Moves the job from `processing` to `failed`, recording the failure
    /// kind and message. The job row is never deleted.
    async fn fail_job(
        &self,
        id: JobId,
        failure_kind: &str,
        error_message: &str,
    ) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}
