use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorIndex},
    PipelineError, SearchResult,
};

/// Embeds a query and runs top-k similarity search against the index.
pub struct RetrievalService {
    embedding: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
    default_top_k: usize,
}

impl RetrievalService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            index,
            default_top_k,
        }
    }

    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>, PipelineError> {
        self.retrieve_top_k(query, self.default_top_k).await
    }

    #[instrument(skip(self))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, PipelineError> {
        if top_k == 0 {
            return Err(PipelineError::config("top_k must be positive"));
        }

        let embedding = self.embedding.embed(query).await?;
        self.index.search(&embedding, top_k).await
    }

    pub async fn indexed_chunks(&self) -> Result<usize, PipelineError> {
        self.index.count().await
    }
}
