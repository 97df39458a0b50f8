use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{
    ExtractionRepository, LlmClient, LlmClientError, RepositoryError, TextExtractor,
    TextExtractorError,
};
use super::extraction_service::ExtractionMessage;
use super::{build_prompt, normalize_response, NormalizeError};
use crate::domain::{Clause, JobId};

/// The extraction state machine. Dispatches each submitted job onto its own
/// task driving extract -> prompt -> model -> validate, so one slow model
/// call never delays the jobs queued behind it; each job still commits
/// exactly one terminal status. Every failure kind is caught here and
/// recorded on the job row; nothing escapes as an unhandled fault, and a
/// failed job is never deleted.
pub struct ExtractionWorker {
    receiver: mpsc::Receiver<ExtractionMessage>,
    pipeline: JobPipeline,
}

impl ExtractionWorker {
    pub fn new(
        receiver: mpsc::Receiver<ExtractionMessage>,
        text_extractor: Arc<dyn TextExtractor>,
        llm_client: Arc<dyn LlmClient>,
        repository: Arc<dyn ExtractionRepository>,
    ) -> Self {
        Self {
            receiver,
            pipeline: JobPipeline {
                text_extractor,
                llm_client,
                repository,
            },
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Extraction worker started");
        while let Some(msg) = self.receiver.recv().await {
            let pipeline = self.pipeline.clone();
            tokio::spawn(pipeline.execute(msg));
        }
        tracing::info!("Extraction worker stopped: channel closed");
    }
}

/// Shared collaborators for one job run. Each message gets its own clone,
/// so in-flight jobs proceed independently of each other.
#[derive(Clone)]
struct JobPipeline {
    text_extractor: Arc<dyn TextExtractor>,
    llm_client: Arc<dyn LlmClient>,
    repository: Arc<dyn ExtractionRepository>,
}

impl JobPipeline {
    async fn execute(self, msg: ExtractionMessage) {
        let job_id = msg.job_id;
        let span = tracing::info_span!("extraction_job", job_id = %job_id.as_uuid());
        let _guard = span.enter();

        match self.process_job(msg).await {
            Ok(clause_count) => {
                tracing::info!(clause_count, "Extraction completed");
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Extraction failed");
                self.mark_failed(job_id, &e).await;
            }
        }
    }

    async fn process_job(&self, msg: ExtractionMessage) -> Result<usize, ExtractionFailure> {
        let text = self
            .text_extractor
            .extract_text(&msg.data, msg.file_type)
            .await?;

        tracing::debug!(text_length = text.len(), "Text extraction complete");

        let prompt = build_prompt(&text);

        let raw_response = self
            .llm_client
            .complete(&prompt.system, &prompt.user)
            .await?;

        tracing::debug!(response_length = raw_response.len(), "Model response received");

        let normalized = normalize_response(&raw_response, text.trim().is_empty())?;

        let clauses: Vec<Clause> = normalized
            .into_iter()
            .map(|c| {
                Clause::new(
                    msg.job_id,
                    c.clause_type,
                    c.title,
                    c.content,
                    c.order,
                    c.extra_data,
                )
            })
            .collect();

        let extra_data = serde_json::json!({
            "total_clauses": clauses.len(),
            "text_length": text.len(),
        });

        self.repository
            .complete_job(msg.job_id, &clauses, extra_data)
            .await?;

        Ok(clauses.len())
    }

    async fn mark_failed(&self, job_id: JobId, failure: &ExtractionFailure) {
        if let Err(e) = self
            .repository
            .fail_job(job_id, failure.kind(), &failure.to_string())
            .await
        {
            tracing::error!(
                job_id = %job_id.as_uuid(),
                error = %e,
                "Failed to record terminal failure status"
            );
        }
    }
}

/// Everything that can end a job in `failed`, with a stable kind string
/// recorded on the job row so callers can tell input problems from
/// transient model problems.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionFailure {
    #[error("text extraction: {0}")]
    TextExtraction(#[from] TextExtractorError),
    #[error("model call: {0}")]
    Model(#[from] LlmClientError),
    #[error("response validation: {0}")]
    Validation(#[from] NormalizeError),
    #[error("persistence: {0}")]
    Persistence(#[from] RepositoryError),
}

impl ExtractionFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionFailure::TextExtraction(TextExtractorError::UnsupportedEncoding) => {
                "unsupported_encoding"
            }
            ExtractionFailure::TextExtraction(TextExtractorError::UnreadableDocument(_)) => {
                "unreadable_document"
            }
            ExtractionFailure::TextExtraction(TextExtractorError::DocumentTooLarge { .. }) => {
                "document_too_large"
            }
            ExtractionFailure::Model(LlmClientError::Timeout) => "model_timeout",
            ExtractionFailure::Model(LlmClientError::Unavailable(_)) => "model_unavailable",
            ExtractionFailure::Validation(NormalizeError::MalformedModelOutput(_)) => {
                "malformed_model_output"
            }
            ExtractionFailure::Validation(NormalizeError::EmptyExtractionResult) => {
                "empty_extraction_result"
            }
            ExtractionFailure::Persistence(_) => "internal",
        }
    }
}
