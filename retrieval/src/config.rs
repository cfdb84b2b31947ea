//! Configuration for the retrieval service.

use std::path::Path;

use learnpath_embeddings::{DistanceMetric, EmbeddingConfig};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};

/// Default number of neighbors retrieved per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Configuration for the retrieval service.
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,

    /// Neighbors retrieved per query before level filtering.
    pub top_k: usize,

    /// Distance used for indexing and querying.
    pub metric: DistanceMetric,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            top_k: DEFAULT_TOP_K,
            metric: DistanceMetric::default(),
        }
    }
}

impl RetrievalConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| RetrievalError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
            .map_err(|e| RetrievalError::Config(format!("{}: {e}", path.display())))
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RetrievalError::Config(
                "top_k must be greater than zero".to_string(),
            ));
        }
        if self.embedding.dimension == Some(0) {
            return Err(RetrievalError::Config(
                "embedding.dimension must be greater than zero".to_string(),
            ));
        }
        if self.embedding.max_tokens == 0 {
            return Err(RetrievalError::Config(
                "embedding.max_tokens must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the number of neighbors per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the embedding configuration.
    pub fn with_embedding(mut self, config: EmbeddingConfig) -> Self {
        self.embedding = config;
        self
    }
}
