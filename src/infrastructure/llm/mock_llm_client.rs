use async_trait::async_trait;

use crate::application::ports::{LlmClient, LlmClientError};

/// Returns a canned, well-formed clause array; used for database-less local
/// runs and wiring tests.
pub struct MockLlmClient;

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, LlmClientError> {
        Ok(r#"[{"clause_type":"other","title":"Mock clause","content":"Mock clause content.","summary":"Stub response."}]"#
            .to_string())
    }
}
