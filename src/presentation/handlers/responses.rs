use serde::Serialize;

use crate::domain::{Clause, ExtractionJob};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct ClauseResponse {
    pub id: String,
    pub extraction_id: String,
    pub clause_type: String,
    pub title: String,
    pub content: String,
    pub order: u32,
    pub extra_data: serde_json::Value,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ExtractionResponse {
    pub id: String,
    pub filename: String,
    pub file_type: String,
    pub file_size: u64,
    pub status: String,
    pub error_message: Option<String>,
    pub extra_data: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
    pub clauses: Vec<ClauseResponse>,
}

impl ExtractionResponse {
    pub fn from_job(job: ExtractionJob, clauses: Vec<Clause>) -> Self {
        Self {
            id: job.id.as_uuid().to_string(),
            filename: job.filename,
            file_type: job.file_type.as_str().to_string(),
            file_size: job.file_size,
            status: job.status.as_str().to_string(),
            error_message: job.error_message,
            extra_data: job.extra_data,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
            clauses: clauses.into_iter().map(ClauseResponse::from).collect(),
        }
    }
}

impl From<Clause> for ClauseResponse {
    fn from(clause: Clause) -> Self {
        Self {
            id: clause.id.as_uuid().to_string(),
            extraction_id: clause.job_id.as_uuid().to_string(),
            clause_type: clause.clause_type.as_str().to_string(),
            title: clause.title,
            content: clause.content,
            order: clause.order,
            extra_data: clause.extra_data,
            created_at: clause.created_at.to_rfc3339(),
        }
    }
}
