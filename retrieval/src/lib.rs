//! # Retrieval
//!
//! Level-aware retrieval over a small educational corpus:
//!
//! - **Corpus**: validated, compiled-in documents tagged with a skill level
//! - **Retrieval**: embed the query, find its nearest documents
//! - **Learning paths**: keep the documents a learner's level admits, in
//!   rank order
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Retrieval Pipeline                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  startup:  CorpusStore ──► EmbeddingProvider ──► VectorIndex    │
//! │                                                                 │
//! │  query:    Query ──► RetrievalService ──► RankedResult          │
//! │                                                 │               │
//! │                                                 ▼               │
//! │                              PathFilter ──► PathOutcome         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use learnpath_retrieval::{Level, Query, RetrievalConfig, RetrievalService};
//!
//! let service = RetrievalService::start(RetrievalConfig::default()).await?;
//! let outcome = service
//!     .recommend(&Query::new("How do I create a function in Python?", Level::Intermediate))
//!     .await?;
//! ```

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod path;
pub mod query;

pub use config::{DEFAULT_TOP_K, RetrievalConfig};
pub use corpus::{CorpusStore, Document, DocumentMetadata, Level, SeedDocument};
pub use engine::{RetrievalService, RetrievalServiceBuilder, ServiceStats};
pub use error::{Result, RetrievalError};
pub use path::{LearningPath, PathFilter, PathOutcome};
pub use query::{Query, RankedDocument, RankedResult};

// Re-export from dependencies for convenience
pub use learnpath_embeddings::{DistanceMetric, EmbeddingConfig, EmbeddingProvider, ProviderKind};
