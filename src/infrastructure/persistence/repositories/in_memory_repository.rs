use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::ports::{ExtractionRepository, Page, RepositoryError};
use crate::domain::{Clause, ExtractionJob, JobId, JobStatus, UserId};

/// Map-backed repository for tests and database-less local runs. The status
/// guard goes through the same domain transition function the real store
/// enforces with its `WHERE status = 'processing'` clause.
#[derive(Default)]
pub struct InMemoryExtractionRepository {
    jobs: Mutex<HashMap<JobId, ExtractionJob>>,
    clauses: Mutex<HashMap<JobId, Vec<Clause>>>,
}

impl InMemoryExtractionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExtractionRepository for InMemoryExtractionRepository {
    async fn create_job(&self, job: &ExtractionJob) -> Result<(), RepositoryError> {
        self.jobs.lock().unwrap().insert(job.id, job.clone());
        Ok(())
    }

    async fn get_job(&self, id: JobId) -> Result<Option<ExtractionJob>, RepositoryError> {
        Ok(self.jobs.lock().unwrap().get(&id).cloned())
    }

    async fn get_clauses(&self, job_id: JobId) -> Result<Vec<Clause>, RepositoryError> {
        Ok(self
            .clauses
            .lock()
            .unwrap()
            .get(&job_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_jobs(
        &self,
        user_id: &UserId,
        skip: u64,
        limit: u64,
    ) -> Result<Page, RepositoryError> {
        let jobs = self.jobs.lock().unwrap();
        let mut owned: Vec<ExtractionJob> = jobs
            .values()
            .filter(|j| &j.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = owned.len() as u64;
        let page = owned
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect();

        Ok(Page { total, jobs: page })
    }

    async fn complete_job(
        &self,
        id: JobId,
        clauses: &[Clause],
        extra_data: serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.as_uuid().to_string()))?;

        job.status = job
            .status
            .transition(JobStatus::Completed)
            .map_err(|e| RepositoryError::InvalidTransition(e.to_string()))?;
        job.extra_data = extra_data;
        job.updated_at = Utc::now();

        self.clauses.lock().unwrap().insert(id, clauses.to_vec());
        Ok(())
    }

    async fn fail_job(
        &self,
        id: JobId,
        failure_kind: &str,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.as_uuid().to_string()))?;

        job.status = job
            .status
            .transition(JobStatus::Failed)
            .map_err(|e| RepositoryError::InvalidTransition(e.to_string()))?;
        job.error_message = Some(error_message.to_string());
        job.extra_data = serde_json::json!({ "failure_kind": failure_kind });
        job.updated_at = Utc::now();

        Ok(())
    }
}
