use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{ports::VectorIndex, Chunk, Embedding, PipelineError, SearchResult};

/// Insertion-ordered linear-scan index, the reference implementation.
///
/// The store keeps one entry per chunk id. Overwrites replace an entry in
/// place, so the earliest-ingested-wins tie-break holds across re-ingestion.
/// The reader-writer lock keeps queries from observing a partially-ingested
/// chunk set.
pub struct InMemoryVectorIndex {
    entries: RwLock<Vec<(Chunk, Embedding)>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, chunk: &Chunk, embedding: &Embedding) -> Result<(), PipelineError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| PipelineError::internal(e.to_string()))?;

        match entries.iter_mut().find(|(c, _)| c.id == chunk.id) {
            Some(entry) => *entry = (chunk.clone(), embedding.clone()),
            None => entries.push((chunk.clone(), embedding.clone())),
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, PipelineError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| PipelineError::internal(e.to_string()))?;

        let mut results: Vec<SearchResult> = entries
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        // Stable sort over the insertion-ordered scan: equal scores keep the
        // earliest-ingested chunk first.
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        results.truncate(top_k);
        Ok(results)
    }

    async fn count(&self) -> Result<usize, PipelineError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| PipelineError::internal(e.to_string()))?;
        Ok(entries.len())
    }

    async fn delete_by_source(&self, source_id: &str) -> Result<(), PipelineError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| PipelineError::internal(e.to_string()))?;
        entries.retain(|(chunk, _)| chunk.source_id != source_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, index: usize) -> Chunk {
        Chunk::new("src.txt", text, index)
    }

    #[tokio::test]
    async fn upsert_and_search() {
        let index = InMemoryVectorIndex::new();
        let c = chunk("test content", 0);
        index.upsert(&c, &Embedding::new(vec![1.0, 0.0, 0.0])).await.unwrap();

        let results = index
            .search(&Embedding::new(vec![1.0, 0.0, 0.0]), 1)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn empty_index_returns_empty_result() {
        let index = InMemoryVectorIndex::new();
        let results = index
            .search(&Embedding::new(vec![1.0, 0.0]), 5)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn returns_at_most_k_descending_without_duplicates() {
        let index = InMemoryVectorIndex::new();
        for (i, v) in [
            vec![1.0, 0.0],
            vec![0.8, 0.2],
            vec![0.0, 1.0],
            vec![0.9, 0.1],
        ]
        .into_iter()
        .enumerate()
        {
            index
                .upsert(&chunk(&format!("c{i}"), i), &Embedding::new(v))
                .await
                .unwrap();
        }

        let results = index
            .search(&Embedding::new(vec![1.0, 0.0]), 3)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        let mut ids: Vec<_> = results.iter().map(|r| r.chunk.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn ties_break_by_insertion_order() {
        let index = InMemoryVectorIndex::new();
        let first = chunk("first", 0);
        let second = chunk("second", 1);
        // Identical embeddings, identical scores.
        let e = Embedding::new(vec![0.5, 0.5]);
        index.upsert(&first, &e).await.unwrap();
        index.upsert(&second, &e).await.unwrap();

        let results = index
            .search(&Embedding::new(vec![0.5, 0.5]), 2)
            .await
            .unwrap();
        assert_eq!(results[0].chunk.id, first.id);
        assert_eq!(results[1].chunk.id, second.id);
    }

    #[tokio::test]
    async fn upsert_overwrites_in_place() {
        let index = InMemoryVectorIndex::new();
        let first = chunk("first", 0);
        let second = chunk("second", 1);
        let e = Embedding::new(vec![0.5, 0.5]);
        index.upsert(&first, &e).await.unwrap();
        index.upsert(&second, &e).await.unwrap();

        // Re-ingesting the first chunk must not demote it behind the second.
        index.upsert(&first, &e).await.unwrap();

        assert_eq!(index.count().await.unwrap(), 2);
        let results = index
            .search(&Embedding::new(vec![0.5, 0.5]), 2)
            .await
            .unwrap();
        assert_eq!(results[0].chunk.id, first.id);
    }

    #[tokio::test]
    async fn delete_by_source_removes_entries() {
        let index = InMemoryVectorIndex::new();
        index
            .upsert(&chunk("keep me", 0), &Embedding::new(vec![1.0]))
            .await
            .unwrap();
        index
            .upsert(
                &Chunk::new("other.txt", "other", 0),
                &Embedding::new(vec![1.0]),
            )
            .await
            .unwrap();

        index.delete_by_source("src.txt").await.unwrap();
        assert_eq!(index.count().await.unwrap(), 1);
        let results = index.search(&Embedding::new(vec![1.0]), 10).await.unwrap();
        assert_eq!(results[0].chunk.source_id, "other.txt");
    }
}
