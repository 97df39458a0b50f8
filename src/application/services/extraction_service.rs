use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{ExtractionRepository, RepositoryError};
use crate::domain::{ExtractionJob, FileType, JobId, UserId};

/// Unit of work handed to the extraction worker. The job row already exists
/// in `processing` by the time the message is sent.
pub struct ExtractionMessage {
    pub job_id: JobId,
    pub file_type: FileType,
    pub data: Vec<u8>,
}

/// Submission half of the orchestrator: validates the declared file type,
/// persists the job row before any work starts, and enqueues the pipeline.
/// The returned identifier lets the caller poll regardless of how long the
/// model call takes or whether the caller stays connected.
pub struct ExtractionService {
    repository: Arc<dyn ExtractionRepository>,
    sender: mpsc::Sender<ExtractionMessage>,
}

impl ExtractionService {
    pub fn new(
        repository: Arc<dyn ExtractionRepository>,
        sender: mpsc::Sender<ExtractionMessage>,
    ) -> Self {
        Self { repository, sender }
    }

    pub async fn submit(
        &self,
        data: Vec<u8>,
        filename: &str,
        user_id: UserId,
    ) -> Result<JobId, SubmitError> {
        let extension = filename.rsplit('.').next().unwrap_or_default();
        let file_type = FileType::from_extension(extension)
            .ok_or_else(|| SubmitError::UnsupportedFileType(extension.to_string()))?;

        let job = ExtractionJob::new(user_id, filename.to_string(), file_type, data.len() as u64);
        let job_id = job.id;

        self.repository.create_job(&job).await?;

        tracing::info!(
            job_id = %job_id.as_uuid(),
            filename = %job.filename,
            file_type = %file_type,
            bytes = data.len(),
            "Extraction job accepted"
        );

        self.sender
            .send(ExtractionMessage {
                job_id,
                file_type,
                data,
            })
            .await
            .map_err(|_| SubmitError::WorkerUnavailable)?;

        Ok(job_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("extraction worker unavailable")]
    WorkerUnavailable,
}
