use async_trait::async_trait;

use crate::domain::{errors::PipelineError, Document};

/// Named text blobs backing the corpus. A missing source surfaces as
/// `PipelineError::DocumentNotFound` before any chunking is attempted.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load(&self, source_id: &str) -> Result<Document, PipelineError>;
}
