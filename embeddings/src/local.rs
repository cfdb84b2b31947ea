//! Local sentence-embedding models run through ONNX Runtime.
//!
//! Model weights are fetched on first use and cached on disk by `fastembed`;
//! wrap the provider in the registry so a process loads each model once.

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, check_input};
use crate::similarity::normalize;

/// Resolve a model identifier to a `fastembed` model.
///
/// Accepts the bare name or the `sentence-transformers/` / `BAAI/` prefixed
/// form, case-insensitively.
pub fn model_for(name: &str) -> Option<EmbeddingModel> {
    let bare = name.rsplit('/').next().unwrap_or(name).to_ascii_lowercase();
    match bare.as_str() {
        "all-minilm-l6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Some(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Some(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Some(EmbeddingModel::BGEBaseENV15),
        "bge-large-en-v1.5" => Some(EmbeddingModel::BGELargeENV15),
        _ => None,
    }
}

/// Sentence-transformer embeddings computed in-process.
pub struct FastEmbedProvider {
    model: TextEmbedding,
    model_name: String,
    dimension: usize,
    max_tokens: usize,
}

impl FastEmbedProvider {
    /// Load `model_name`, downloading it if it is not cached yet.
    pub fn new(model_name: impl Into<String>, dimension: usize, max_tokens: usize) -> Result<Self> {
        let model_name = model_name.into();
        let model = model_for(&model_name).ok_or_else(|| {
            EmbeddingError::ProviderNotConfigured(format!(
                "unknown fastembed model `{model_name}`"
            ))
        })?;

        info!("Loading embedding model {model_name}");
        let model = TextEmbedding::try_new(InitOptions::new(model)).map_err(|e| {
            EmbeddingError::ProviderNotConfigured(format!(
                "failed to initialize {model_name}: {e}"
            ))
        })?;

        Ok(Self {
            model,
            model_name,
            dimension,
            max_tokens,
        })
    }

    fn finish(&self, mut embedding: Embedding) -> Result<Embedding> {
        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        normalize(&mut embedding);
        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    fn name(&self) -> &str {
        "fastembed"
    }

    fn model(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        check_input(text, self.max_tokens)?;

        let embedding = self
            .model
            .embed(vec![text], None)
            .map_err(|e| EmbeddingError::InvalidResponse(format!("embedding failed: {e}")))?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("no embedding generated".to_string()))?;

        self.finish(embedding)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        for text in texts {
            check_input(text, self.max_tokens)?;
        }
        debug!("Embedding batch of {} texts with {}", texts.len(), self.model_name);

        let embeddings = self
            .model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::InvalidResponse(format!("batch embedding failed: {e}")))?;
        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        embeddings.into_iter().map(|e| self.finish(e)).collect()
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[test]
    fn test_model_names() {
        assert!(matches!(
            model_for("all-MiniLM-L6-v2"),
            Some(EmbeddingModel::AllMiniLML6V2)
        ));
        assert!(matches!(
            model_for("sentence-transformers/all-MiniLM-L6-v2"),
            Some(EmbeddingModel::AllMiniLML6V2)
        ));
        assert!(matches!(
            model_for("BAAI/bge-small-en-v1.5"),
            Some(EmbeddingModel::BGESmallENV15)
        ));
        assert!(model_for("text-embedding-3-small").is_none());
    }

    #[test]
    fn test_unknown_model_is_not_configured() {
        assert!(matches!(
            FastEmbedProvider::new("no-such-model", 384, 256),
            Err(EmbeddingError::ProviderNotConfigured(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires downloading model
    async fn test_minilm_embeds_paraphrases_close() {
        let provider = FastEmbedProvider::new("all-MiniLM-L6-v2", 384, 256).unwrap();

        let query = provider.embed("How do I write a subroutine?").await.unwrap();
        let functions = provider
            .embed("Functions are blocks of reusable code defined with the def keyword.")
            .await
            .unwrap();
        let lists = provider
            .embed("Lists store ordered collections in square brackets.")
            .await
            .unwrap();

        assert_eq!(query.len(), 384);
        let close = cosine_similarity(&query, &functions).unwrap();
        let far = cosine_similarity(&query, &lists).unwrap();
        assert!(close > far, "{close} should exceed {far}");
    }
}
