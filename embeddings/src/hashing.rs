//! Offline embedding model based on signed feature hashing.
//!
//! Each word is lowercased, stop words are dropped, and the remaining tokens
//! are hashed with SHA-256 into a fixed number of buckets. The bucket comes
//! from the first eight digest bytes, the sign from the ninth. Term counts
//! are accumulated and the vector is L2-normalized, so texts sharing
//! content words land close together under every supported metric.
//!
//! The output depends only on the text, the dimension and the stop-word
//! list, which makes it reproducible across runs and platforms.

use std::collections::HashSet;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, check_input};
use crate::similarity::normalize;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for", "from", "has",
    "he", "how", "i", "in", "is", "it", "its", "of", "on", "or", "that", "the", "this", "to",
    "was", "were", "what", "when", "which", "will", "with", "you", "your",
];

/// Deterministic bag-of-words embedder that needs no model files.
pub struct HashingProvider {
    model: String,
    dimension: usize,
    max_tokens: usize,
    stop_words: HashSet<&'static str>,
}

impl HashingProvider {
    /// Create a hashing provider with the given output dimension.
    pub fn new(model: impl Into<String>, dimension: usize, max_tokens: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(EmbeddingError::ProviderNotConfigured(
                "hashing provider needs a dimension greater than zero".to_string(),
            ));
        }

        let model = model.into();
        info!("Loading hashing embedding model {model} (dimension {dimension})");
        Ok(Self {
            model,
            dimension,
            max_tokens,
            stop_words: STOP_WORDS.iter().copied().collect(),
        })
    }

    /// Content tokens of `text`, in order, after stop-word removal.
    pub fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        text.unicode_words()
            .map(str::to_lowercase)
            .filter(|word| !self.stop_words.contains(word.as_str()))
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let digest = Sha256::digest(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(head) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }

    fn embed_sync(&self, text: &str) -> Result<Embedding> {
        check_input(text, self.max_tokens)?;

        let mut embedding = vec![0.0f32; self.dimension];
        for token in self.tokens(text) {
            let (bucket, sign) = self.bucket(&token);
            embedding[bucket] += sign;
        }
        normalize(&mut embedding);
        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingProvider {
    fn name(&self) -> &str {
        "hashing"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.embed_sync(text)
    }

    fn is_available(&self) -> bool {
        true
    }
}
