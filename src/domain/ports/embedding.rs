use crate::domain::{errors::PipelineError, Embedding};
use async_trait::async_trait;

/// External embedding backend. Must be deterministic for identical text under
/// a fixed model; failures surface as `PipelineError::Embedding`, never as a
/// substituted zero vector.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, PipelineError>;
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, PipelineError>;
    fn dimension(&self) -> usize;
}
