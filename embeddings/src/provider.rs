//! Embedding providers.
//!
//! Every provider rejects empty input and input longer than its token limit
//! instead of truncating, so callers can shorten the text and try again.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Get the model this provider embeds with.
    fn model(&self) -> &str;

    /// Length of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Generate an embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Check if the provider is available (API key set, etc.).
    fn is_available(&self) -> bool;
}

/// Validate text against the shared input policy.
pub(crate) fn check_input(text: &str, max_tokens: usize) -> Result<()> {
    if text.trim().is_empty() {
        return Err(EmbeddingError::EmptyInput);
    }

    let length = text.unicode_words().count();
    if length > max_tokens {
        return Err(EmbeddingError::TextTooLong {
            length,
            max_length: max_tokens,
        });
    }
    Ok(())
}

/// OpenAI embedding provider.
pub struct OpenAIProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    model: String,

    dimension: usize,

    /// Whether requests carry the `dimensions` parameter.
    dimensions_param: bool,

    max_tokens: usize,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider reading its key from `OPENAI_API_KEY`.
    ///
    /// Only `text-embedding-3-*` models accept a requested dimension, so the
    /// parameter is sent for those alone unless enabled explicitly.
    pub fn new(model: impl Into<String>, dimension: usize) -> Self {
        let model = model.into();
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
            dimensions_param: model.starts_with("text-embedding-3"),
            model,
            dimension,
            max_tokens: crate::DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Read the API key from another environment variable.
    pub fn with_api_key_env(mut self, var: &str) -> Self {
        self.api_key = std::env::var(var).ok();
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the input limit.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Send (or stop sending) the requested dimension to the API.
    pub fn with_dimensions_param(mut self, enabled: bool) -> Self {
        self.dimensions_param = enabled;
        self
    }

    async fn request(&self, input: serde_json::Value) -> Result<OpenAIEmbeddingResponse> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            EmbeddingError::ProviderNotConfigured("no API key for openai provider".to_string())
        })?;

        let mut body = serde_json::json!({
            "input": input,
            "model": self.model,
        });
        if self.dimensions_param {
            body["dimensions"] = serde_json::json!(self.dimension);
        }

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            warn!("Embedding API rate limited, retry after {retry_after}s");
            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Embedding API returned {status}");
            return Err(EmbeddingError::ApiRequest(format!(
                "API error ({status}): {error_text}"
            )));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    fn checked(&self, embedding: Embedding) -> Result<Embedding> {
        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        check_input(text, self.max_tokens)?;
        debug!("Generating embedding with model: {}", self.model);

        let result = self.request(serde_json::json!(text)).await?;
        let embedding = result
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding in response".to_string()))?
            .embedding;

        self.checked(embedding)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        for text in texts {
            check_input(text, self.max_tokens)?;
        }

        debug!(
            "Generating batch embeddings for {} texts with model: {}",
            texts.len(),
            self.model
        );

        let mut result = self.request(serde_json::json!(texts)).await?;
        if result.data.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                result.data.len()
            )));
        }

        // The API may answer out of order; `index` ties each vector to its input.
        result.data.sort_by_key(|item| item.index);
        let embeddings = result
            .data
            .into_iter()
            .map(|item| self.checked(item.embedding))
            .collect::<Result<Vec<_>>>()?;

        info!("Generated {} batch embeddings", embeddings.len());
        Ok(embeddings)
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// OpenAI API response format.
#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
