//! Retrieval service implementation.

use std::sync::Arc;

use learnpath_embeddings::{
    DistanceMetric, EmbeddingError, EmbeddingProvider, FlatIndex, IndexEntry, VectorIndex,
    shared_provider,
};
use tracing::{debug, info};

use crate::config::RetrievalConfig;
use crate::corpus::{CorpusStore, DocumentMetadata};
use crate::error::{Result, RetrievalError};
use crate::path::PathOutcome;
use crate::query::{Query, RankedDocument, RankedResult};

/// Boxed index over document metadata.
pub type DocumentIndex = Box<dyn VectorIndex<DocumentMetadata>>;

/// Embeds queries, searches the index and maps hits back to documents.
///
/// The index is fully built before a service value exists, so every query
/// observes the complete corpus.
pub struct RetrievalService {
    /// Configuration.
    config: RetrievalConfig,

    /// Source of truth for documents.
    corpus: CorpusStore,

    /// Shared embedding provider.
    embedder: Arc<dyn EmbeddingProvider>,

    /// Vector index over the corpus.
    index: DocumentIndex,
}

impl RetrievalService {
    /// Create a new retrieval service builder.
    pub fn builder() -> RetrievalServiceBuilder {
        RetrievalServiceBuilder::new()
    }

    /// Start a service over the built-in corpus with the given configuration.
    pub async fn start(config: RetrievalConfig) -> Result<Self> {
        Self::builder().with_config(config).build().await
    }

    /// Retrieve the `k` documents closest to the query text.
    pub async fn retrieve(&self, query: &Query, k: usize) -> Result<RankedResult> {
        if k == 0 {
            return Err(RetrievalError::InvalidArgument(
                "k must be greater than zero".to_string(),
            ));
        }

        debug!("Retrieving top {k} for query: {}", query.text);

        let vector = self
            .embedder
            .embed(&query.text)
            .await
            .map_err(RetrievalError::Embedding)?;

        let neighbors = self
            .index
            .query(&vector, k)
            .map_err(RetrievalError::Index)?;

        let mut ranked = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            let document = self
                .corpus
                .get(&neighbor.entry.id)
                .ok_or_else(|| RetrievalError::MissingDocument(neighbor.entry.id.clone()))?;
            debug_assert_eq!(document.metadata(), neighbor.entry.metadata);

            ranked.push(RankedDocument {
                document: Arc::clone(document),
                distance: neighbor.distance,
            });
        }

        debug!("Retrieved {} documents", ranked.len());
        Ok(RankedResult::new(ranked))
    }

    /// Retrieve with the configured `top_k` and apply the level filter.
    pub async fn recommend(&self, query: &Query) -> Result<PathOutcome> {
        let ranked = self.retrieve(query, self.config.top_k).await?;
        let outcome = PathOutcome::from_ranked(&ranked, query.level);

        match &outcome {
            PathOutcome::Path(path) => {
                debug!("Learning path has {} of {} steps", path.len(), ranked.len())
            }
            PathOutcome::NoRelevantContent => debug!("No documents retrieved"),
            PathOutcome::LevelMismatch { matched } => {
                debug!("{matched} documents retrieved, none at level {}", query.level)
            }
        }
        Ok(outcome)
    }

    /// Get the loaded corpus.
    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    /// Get the active configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Get service statistics.
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            documents: self.corpus.len(),
            indexed: self.index.len(),
            dimension: self.index.dimension(),
            metric: self.index.metric(),
            provider: self.embedder.name().to_string(),
            model: self.embedder.model().to_string(),
        }
    }
}

/// Builder for the retrieval service.
///
/// Unset parts fall back to the built-in corpus, the shared provider for
/// the configured embedding settings, and an exact [`FlatIndex`].
pub struct RetrievalServiceBuilder {
    config: RetrievalConfig,
    corpus: Option<CorpusStore>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<DocumentIndex>,
}

impl RetrievalServiceBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: RetrievalConfig::default(),
            corpus: None,
            embedder: None,
            index: None,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a specific corpus instead of the built-in course.
    pub fn with_corpus(mut self, corpus: CorpusStore) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Use a specific embedding provider instead of the shared one.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Use a specific (empty or stale) index; it is rebuilt during `build`.
    pub fn with_index(mut self, index: DocumentIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Load the corpus, embed it and build the index.
    pub async fn build(self) -> Result<RetrievalService> {
        self.config.validate()?;

        let corpus = match self.corpus {
            Some(corpus) => corpus,
            None => CorpusStore::load()?,
        };
        let embedder = match self.embedder {
            Some(embedder) => embedder,
            None => shared_provider(&self.config.embedding).map_err(RetrievalError::Embedding)?,
        };
        let mut index: DocumentIndex = match self.index {
            Some(index) => index,
            None => Box::new(FlatIndex::with_metric(
                embedder.dimension(),
                self.config.metric,
            )),
        };

        info!(
            "Embedding {} documents with {} ({})",
            corpus.len(),
            embedder.model(),
            embedder.name()
        );

        let contents: Vec<&str> = corpus
            .documents()
            .iter()
            .map(|d| d.content.as_str())
            .collect();
        let vectors = embedder
            .embed_batch(&contents)
            .await
            .map_err(RetrievalError::Embedding)?;
        if vectors.len() != corpus.len() {
            return Err(RetrievalError::Embedding(EmbeddingError::InvalidResponse(
                format!(
                    "expected {} document embeddings, got {}",
                    corpus.len(),
                    vectors.len()
                ),
            )));
        }

        let entries = corpus
            .documents()
            .iter()
            .zip(vectors)
            .map(|(document, vector)| IndexEntry::new(&document.id, vector, document.metadata()))
            .collect();
        index.rebuild(entries).map_err(RetrievalError::Index)?;

        info!(
            "Retrieval service ready: {} entries, dimension {}, metric {}",
            index.len(),
            index.dimension(),
            index.metric()
        );

        Ok(RetrievalService {
            config: self.config,
            corpus,
            embedder,
            index,
        })
    }
}

impl Default for RetrievalServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the retrieval service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceStats {
    /// Number of loaded documents.
    pub documents: usize,

    /// Number of index entries.
    pub indexed: usize,

    /// Vector dimension.
    pub dimension: usize,

    /// Distance metric.
    pub metric: DistanceMetric,

    /// Embedding provider name.
    pub provider: String,

    /// Embedding model identifier.
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnpath_embeddings::{EmbeddingConfig, ProviderKind};
    use pretty_assertions::assert_eq;

    fn hashing_config() -> RetrievalConfig {
        RetrievalConfig::default().with_embedding(EmbeddingConfig::new(ProviderKind::Hashing))
    }

    #[tokio::test]
    async fn test_start_with_defaults() {
        let service = RetrievalService::start(hashing_config())
            .await
            .unwrap();
        let stats = service.stats();

        assert_eq!(stats.documents, 8);
        assert_eq!(stats.indexed, 8);
        assert_eq!(stats.dimension, 384);
        assert_eq!(stats.metric, DistanceMetric::L2);
        assert_eq!(stats.provider, "hashing");
        assert_eq!(stats.model, "hashing-bow-v1");
    }

    #[tokio::test]
    async fn test_zero_k_is_invalid_argument() {
        let service = RetrievalService::start(hashing_config())
            .await
            .unwrap();
        let err = service
            .retrieve(&Query::new("functions", crate::Level::Beginner), 0)
            .await
            .unwrap_err();

        assert!(matches!(err, RetrievalError::InvalidArgument(_)));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_invalid_config_aborts_startup() {
        let config = hashing_config().with_top_k(0);
        assert!(matches!(
            RetrievalService::start(config).await,
            Err(RetrievalError::Config(_))
        ));
    }
}
