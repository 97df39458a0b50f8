use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ClauseType, JobId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClauseId(Uuid);

impl ClauseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ClauseId {
    fn default() -> Self {
        Self::new()
    }
}

/// One structured, typed segment of contract text produced by the model and
/// accepted by validation. Clauses exist only for completed jobs, written in
/// a single batch and never mutated afterward; `order` values are contiguous
/// from zero within a job.
#[derive(Debug, Clone)]
pub struct Clause {
    pub id: ClauseId,
    pub job_id: JobId,
    pub clause_type: ClauseType,
    pub title: String,
    pub content: String,
    pub order: u32,
    pub extra_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Clause {
    pub fn new(
        job_id: JobId,
        clause_type: ClauseType,
        title: String,
        content: String,
        order: u32,
        extra_data: serde_json::Value,
    ) -> Self {
        Self {
            id: ClauseId::new(),
            job_id,
            clause_type,
            title,
            content,
            order,
            extra_data,
            created_at: Utc::now(),
        }
    }
}
