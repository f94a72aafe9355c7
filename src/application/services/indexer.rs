use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{DocumentSource, EmbeddingService, VectorIndex},
    split_document, PipelineError,
};

/// Loads a named document, chunks it and indexes one embedding per chunk.
pub struct IndexService {
    source: Arc<dyn DocumentSource>,
    embedding: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
    chunk_size: usize,
    overlap: usize,
}

impl IndexService {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        embedding: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        chunk_size: usize,
        overlap: usize,
    ) -> Self {
        Self {
            source,
            embedding,
            index,
            chunk_size,
            overlap,
        }
    }

    /// Ingests one source end to end and returns the number of chunks
    /// indexed. Prior entries for the same source are replaced, so re-running
    /// `prepare` after a document change does not leave stale chunks behind.
    #[instrument(skip(self))]
    pub async fn prepare(&self, source_id: &str) -> Result<usize, PipelineError> {
        let doc = self.source.load(source_id).await?;
        let chunks = split_document(&doc, self.chunk_size, self.overlap)?;

        if chunks.is_empty() {
            tracing::warn!(source_id, "no chunks produced, nothing indexed");
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(PipelineError::embedding(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        self.index.delete_by_source(source_id).await?;
        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            self.index.upsert(chunk, embedding).await?;
        }

        tracing::info!(source_id, chunks = chunks.len(), "source indexed");
        Ok(chunks.len())
    }
}
