mod completion;
mod document_source;
mod embedding;
mod vector_index;

pub use completion::CompletionService;
pub use document_source::DocumentSource;
pub use embedding::EmbeddingService;
pub use vector_index::VectorIndex;
