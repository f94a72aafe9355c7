use std::path::Path;

use serde::Deserialize;

use crate::domain::{PipelineError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub session: SessionConfig,
    pub corpus: CorpusConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Retained turns per session, counted as individual messages. The
    /// default of 10 keeps the last 5 user/assistant exchanges.
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Directory holding the source text files.
    pub data_dir: String,
    /// Source indexed at startup; empty disables startup ingestion.
    pub source_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            timeout_seconds: 60,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            timeout_seconds: 30,
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            overlap: 20,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            source_id: "knowledge_base.txt".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            session: SessionConfig::default(),
            corpus: CorpusConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Loads from a YAML file, falling back to defaults when the file is
    /// absent. Invalid parameter combinations fail fast here rather than on
    /// the first request.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| PipelineError::config(format!("cannot read {}: {e}", path.display())))?;
            serde_yaml::from_str(&raw)
                .map_err(|e| PipelineError::config(format!("invalid {}: {e}", path.display())))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(PipelineError::config("chunking.chunk_size must be positive"));
        }
        if self.chunking.overlap >= self.chunking.chunk_size {
            return Err(PipelineError::config(
                "chunking.overlap must be smaller than chunking.chunk_size",
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(PipelineError::config("retrieval.top_k must be positive"));
        }
        if self.session.capacity == 0 {
            return Err(PipelineError::config("session.capacity must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn rejects_overlap_at_least_chunk_size() {
        let mut config = Config::default();
        config.chunking.overlap = config.chunking.chunk_size;
        assert!(matches!(
            config.validate().unwrap_err(),
            PipelineError::Config(_)
        ));
    }

    #[test]
    fn parses_partial_yaml() {
        let config: Config =
            serde_yaml::from_str("retrieval:\n  top_k: 5\nllm:\n  model: test-model\n").unwrap();
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.llm.model, "test-model");
        assert_eq!(config.chunking.chunk_size, 100);
    }
}
