use crate::domain::{errors::PipelineError, Chunk, Embedding, SearchResult};
use async_trait::async_trait;

/// Chunk embedding store answering nearest-neighbor queries.
///
/// Implementations must return results similarity-descending with ties broken
/// by insertion order (earliest-ingested wins), never return a chunk id they
/// did not ingest, and treat an upsert of an existing chunk id as an
/// idempotent overwrite.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, chunk: &Chunk, embedding: &Embedding) -> Result<(), PipelineError>;

    /// Top-k by cosine similarity. An empty index yields an empty result.
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, PipelineError>;

    async fn count(&self) -> Result<usize, PipelineError>;

    async fn delete_by_source(&self, source_id: &str) -> Result<(), PipelineError>;
}
