//! Configuration for embedding providers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_DIMENSION, DEFAULT_MAX_TOKENS};

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Local sentence-transformer model run through `fastembed`.
    #[default]
    #[serde(rename = "fastembed")]
    FastEmbed,
    /// Offline feature-hashing model.
    Hashing,
    /// OpenAI-compatible embeddings API.
    #[serde(rename = "openai")]
    OpenAI,
}

impl ProviderKind {
    /// Model used when the configuration does not name one.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::FastEmbed => "all-MiniLM-L6-v2",
            Self::Hashing => "hashing-bow-v1",
            Self::OpenAI => "text-embedding-3-small",
        }
    }

    /// Dimension used when the configuration does not set one.
    pub fn default_dimension(self, model: &str) -> usize {
        match (self, model) {
            (Self::FastEmbed, m) if m.ends_with("bge-base-en-v1.5") => 768,
            (Self::FastEmbed, m) if m.ends_with("bge-large-en-v1.5") => 1024,
            (Self::FastEmbed, _) | (Self::Hashing, _) => DEFAULT_DIMENSION,
            (Self::OpenAI, "text-embedding-3-large") => 3072,
            (Self::OpenAI, _) => 1536,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FastEmbed => f.write_str("fastembed"),
            Self::Hashing => f.write_str("hashing"),
            Self::OpenAI => f.write_str("openai"),
        }
    }
}

/// Configuration for the embedding provider.
///
/// Two equal configurations always resolve to the same shared provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: ProviderKind,

    /// Model identifier; the provider default when unset.
    pub model: Option<String>,

    /// Output dimension; the model default when unset.
    pub dimension: Option<usize>,

    /// Longest accepted input, in words.
    pub max_tokens: usize,

    /// API base URL (remote providers only).
    pub base_url: String,

    /// Environment variable holding the API key (remote providers only).
    pub api_key_env: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::FastEmbed,
            model: None,
            dimension: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl EmbeddingConfig {
    /// Configuration for the given provider with its defaults.
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            ..Self::default()
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the output dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Set the input limit.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the environment variable the API key is read from.
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }

    /// The model identifier after applying the provider default.
    pub fn resolved_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// The output dimension after applying the model default.
    pub fn resolved_dimension(&self) -> usize {
        self.dimension
            .unwrap_or_else(|| self.provider.default_dimension(self.resolved_model()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_resolve_per_provider() {
        let local = EmbeddingConfig::default();
        assert_eq!(local.provider, ProviderKind::FastEmbed);
        assert_eq!(local.resolved_model(), "all-MiniLM-L6-v2");
        assert_eq!(local.resolved_dimension(), 384);

        let base = EmbeddingConfig::default().with_model("BAAI/bge-base-en-v1.5");
        assert_eq!(base.resolved_dimension(), 768);

        let hashing = EmbeddingConfig::new(ProviderKind::Hashing);
        assert_eq!(hashing.resolved_model(), "hashing-bow-v1");
        assert_eq!(hashing.resolved_dimension(), 384);

        let large = EmbeddingConfig::new(ProviderKind::OpenAI).with_model("text-embedding-3-large");
        assert_eq!(large.resolved_dimension(), 3072);

        let custom = EmbeddingConfig::new(ProviderKind::OpenAI).with_dimension(512);
        assert_eq!(custom.resolved_model(), "text-embedding-3-small");
        assert_eq!(custom.resolved_dimension(), 512);
    }

    #[test]
    fn test_provider_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::OpenAI).unwrap(),
            "\"openai\""
        );
        assert_eq!(
            serde_json::from_str::<ProviderKind>("\"hashing\"").unwrap(),
            ProviderKind::Hashing
        );
        assert_eq!(
            serde_json::from_str::<ProviderKind>("\"fastembed\"").unwrap(),
            ProviderKind::FastEmbed
        );
    }
}
