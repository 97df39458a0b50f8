use async_trait::async_trait;

/// One outbound completion call per invocation; no retries and no state
/// between calls. Retry policy, if any, belongs to the caller.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmClientError>;
}

/// The orchestrator does not distinguish sub-causes of unavailability:
/// rate limiting, network errors, and bad credentials all surface as
/// `Unavailable`.
#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("model call timed out")]
    Timeout,
    #[error("model unavailable: {0}")]
    Unavailable(String),
}
