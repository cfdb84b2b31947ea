//! Error types for the retrieval pipeline.

use learnpath_embeddings::EmbeddingError;
use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur in the retrieval pipeline.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Seed data failed validation; nothing was loaded.
    #[error("invalid corpus entry `{id}`: {reason}")]
    CorpusValidation { id: String, reason: String },

    /// A document or query could not be embedded.
    #[error("embedding error: {0}")]
    Embedding(#[source] EmbeddingError),

    /// The vector index rejected a rebuild or a query vector.
    #[error("index error: {0}")]
    Index(#[source] EmbeddingError),

    /// The caller passed an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The index returned an id the corpus does not know.
    #[error("index entry `{0}` has no matching document")]
    MissingDocument(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RetrievalError {
    /// Whether the failure belongs to a single query and the service can
    /// keep serving afterwards.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Embedding(_) | Self::InvalidArgument(_))
    }

    pub(crate) fn corpus(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorpusValidation {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
