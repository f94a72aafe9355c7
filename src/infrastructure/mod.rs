pub mod config;
pub mod document_source;
pub mod embedding;
pub mod llm;
pub mod vector_index;

pub use config::Config;
pub use document_source::FsDocumentSource;
pub use embedding::OpenAiEmbedding;
pub use llm::GroqCompletion;
pub use vector_index::InMemoryVectorIndex;
