use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{FileType, JobStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
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

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque reference to the owning user. The core never interprets it; the
/// excluded auth collaborator is responsible for it being meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One tracked attempt to extract clauses from a single uploaded document.
/// Created in `Processing` the moment the upload is accepted, moved exactly
/// once to a terminal status, never deleted by the core.
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    pub id: JobId,
    pub user_id: UserId,
    pub filename: String,
    pub file_type: FileType,
    pub file_size: u64,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub extra_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExtractionJob {
    pub fn new(user_id: UserId, filename: String, file_type: FileType, file_size: u64) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            user_id,
            filename,
            file_type,
            file_size,
            status: JobStatus::Processing,
            error_message: None,
            extra_data: serde_json::Value::Object(Default::default()),
            created_at: now,
            updated_at: now,
        }
    }
}
