use crate::domain::{errors::PipelineError, Turn};
use async_trait::async_trait;

/// External text-completion backend, treated as a black box.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Completes `user` under `system`, with prior turns supplied as
    /// role-tagged conversation context.
    async fn complete(
        &self,
        system: &str,
        history: &[Turn],
        user: &str,
    ) -> Result<String, PipelineError>;
}
