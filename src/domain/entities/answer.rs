use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Chunk;

/// One retrieved chunk with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

/// A synthesized answer plus the chunk ids that grounded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub used_chunks: Vec<Uuid>,
}

impl Answer {
    pub fn new(text: impl Into<String>, used_chunks: Vec<Uuid>) -> Self {
        Self {
            text: text.into(),
            used_chunks,
        }
    }
}
