//! # Embeddings
//!
//! This crate turns text into dense vectors and answers nearest-neighbor
//! queries over them for the learnpath recommender.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to vectors with a local
//!   sentence-transformer model, an offline hashing model, or a remote
//!   OpenAI-compatible API
//! - **Shared Providers**: Warm each configured model once per process
//! - **Similarity Search**: Exact k-nearest-neighbor search under L2, cosine
//!   or inner-product distance
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingConfig ──► registry ──► EmbeddingProvider            │
//! │                                        │                        │
//! │                                        ▼                        │
//! │                 IndexEntry ──► VectorIndex (FlatIndex)          │
//! │                                        │                        │
//! │                                        ▼                        │
//! │                          DistanceMetric ──► Neighbor            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod hashing;
pub mod index;
#[cfg(feature = "local-model")]
pub mod local;
pub mod provider;
pub mod registry;
pub mod similarity;

pub use config::{EmbeddingConfig, ProviderKind};
pub use error::{EmbeddingError, Result};
pub use hashing::HashingProvider;
pub use index::{FlatIndex, IndexEntry, Neighbor, VectorIndex};
#[cfg(feature = "local-model")]
pub use local::FastEmbedProvider;
pub use provider::{EmbeddingProvider, OpenAIProvider};
pub use registry::{build_provider, shared_provider};
pub use similarity::{DistanceMetric, cosine_similarity};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of all-MiniLM-L6-v2, also used by the hashing model.
pub const DEFAULT_DIMENSION: usize = 384;

/// Default per-text token limit.
pub const DEFAULT_MAX_TOKENS: usize = 256;
