use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{ports::DocumentSource, Document, PipelineError};

/// Loads named text files from a single data directory.
pub struct FsDocumentSource {
    data_dir: PathBuf,
}

impl FsDocumentSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn resolve(&self, source_id: &str) -> Result<PathBuf, PipelineError> {
        // Source ids are bare file names; reject anything that escapes the
        // data directory.
        let name = Path::new(source_id);
        if source_id.is_empty()
            || name.components().count() != 1
            || name.is_absolute()
        {
            return Err(PipelineError::config(format!(
                "invalid source id: {source_id}"
            )));
        }
        Ok(self.data_dir.join(name))
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn load(&self, source_id: &str) -> Result<Document, PipelineError> {
        let path = self.resolve(source_id)?;

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PipelineError::document_not_found(format!("{} ({})", source_id, path.display()))
            } else {
                PipelineError::internal(format!("cannot read {}: {e}", path.display()))
            }
        })?;

        Ok(Document::new(source_id, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kb.txt"), "Paris is in France.").unwrap();

        let source = FsDocumentSource::new(dir.path());
        let doc = source.load("kb.txt").await.unwrap();
        assert_eq!(doc.source_id, "kb.txt");
        assert_eq!(doc.content, "Paris is in France.");
    }

    #[tokio::test]
    async fn missing_file_is_document_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsDocumentSource::new(dir.path());

        let err = source.load("absent.txt").await.unwrap_err();
        assert!(matches!(err, PipelineError::DocumentNotFound(_)));
        assert_eq!(err.stage(), "document");
    }

    #[tokio::test]
    async fn rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsDocumentSource::new(dir.path());

        let err = source.load("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
