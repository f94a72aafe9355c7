mod contextualizer;
mod indexer;
mod pipeline;
mod retriever;
mod sessions;

pub use contextualizer::QueryContextualizer;
pub use indexer::IndexService;
pub use pipeline::ChatPipeline;
pub use retriever::RetrievalService;
pub use sessions::SessionMemory;
