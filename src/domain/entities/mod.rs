mod answer;
mod document;
mod embedding;
mod session;

pub use answer::{Answer, SearchResult};
pub use document::{split_document, Chunk, Document};
pub use embedding::Embedding;
pub use session::{Session, Turn, TurnRole};
