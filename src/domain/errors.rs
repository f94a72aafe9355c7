use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn document_not_found(msg: impl Into<String>) -> Self {
        Self::DocumentNotFound(msg.into())
    }

    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Pipeline stage to report to callers, without internal detail.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::DocumentNotFound(_) => "document",
            Self::Embedding(_) => "retrieval",
            Self::Synthesis(_) => "synthesis",
            Self::Session(_) => "session",
            Self::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
