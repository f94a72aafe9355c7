use std::time::Duration;

use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingsBuilder;
use rig::providers::openai;

use crate::domain::{ports::EmbeddingService, Embedding, PipelineError};
use crate::infrastructure::config::EmbeddingConfig;

/// OpenAI embedding backend via rig. Reads `OPENAI_API_KEY` from the
/// environment at call time.
pub struct OpenAiEmbedding {
    model: String,
    dimension: usize,
    timeout: Duration,
}

impl OpenAiEmbedding {
    pub fn new() -> Self {
        Self::from_config(&EmbeddingConfig::default())
    }

    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            model: config.model.clone(),
            dimension: config.dimension,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Embedding>, PipelineError> {
        let client = openai::Client::from_env();
        let model = client.embedding_model(&self.model);

        let mut builder = EmbeddingsBuilder::new(model);
        for text in texts {
            builder = builder
                .document(*text)
                .map_err(|e| PipelineError::embedding(e.to_string()))?;
        }

        let embeddings = tokio::time::timeout(self.timeout, builder.build())
            .await
            .map_err(|_| PipelineError::embedding("embedding request timed out"))?
            .map_err(|e| PipelineError::embedding(e.to_string()))?;

        let vectors: Vec<Embedding> = embeddings
            .into_iter()
            .map(|(_doc, emb)| {
                let vec_f32: Vec<f32> = emb.first().vec.into_iter().map(|x| x as f32).collect();
                Embedding::new(vec_f32)
            })
            .collect();

        if vectors.len() != texts.len() {
            return Err(PipelineError::embedding(format!(
                "backend returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }
}

impl Default for OpenAiEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, PipelineError> {
        self.embed_texts(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::embedding("no embedding returned"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, PipelineError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed_texts(texts).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
