//! Process-wide cache of warmed embedding providers.
//!
//! Loading a model is the expensive part of embedding, so each distinct
//! [`EmbeddingConfig`] is turned into a provider at most once per process.
//! Later lookups with an equal configuration return the same instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::config::{EmbeddingConfig, ProviderKind};
use crate::error::Result;
use crate::hashing::HashingProvider;
use crate::provider::{EmbeddingProvider, OpenAIProvider};

static PROVIDERS: Lazy<Mutex<HashMap<EmbeddingConfig, Arc<dyn EmbeddingProvider>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Get the shared provider for `config`, creating it on first use.
///
/// Construction happens under the registry lock, so concurrent first calls
/// still warm a single instance.
pub fn shared_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let mut providers = PROVIDERS.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(provider) = providers.get(config) {
        debug!("Reusing warmed {} provider", provider.name());
        return Ok(Arc::clone(provider));
    }

    let provider = build_provider(config)?;
    info!(
        "Warmed {} embedding provider (model {}, dimension {})",
        provider.name(),
        provider.model(),
        provider.dimension()
    );
    providers.insert(config.clone(), Arc::clone(&provider));
    Ok(provider)
}

/// Build a fresh, unshared provider for `config`.
pub fn build_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let model = config.resolved_model();
    let dimension = config.resolved_dimension();

    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        #[cfg(feature = "local-model")]
        ProviderKind::FastEmbed => Arc::new(crate::local::FastEmbedProvider::new(
            model,
            dimension,
            config.max_tokens,
        )?),
        #[cfg(not(feature = "local-model"))]
        ProviderKind::FastEmbed => {
            return Err(crate::error::EmbeddingError::ProviderNotConfigured(
                "built without the `local-model` feature".to_string(),
            ));
        }
        ProviderKind::Hashing => Arc::new(HashingProvider::new(
            model,
            dimension,
            config.max_tokens,
        )?),
        ProviderKind::OpenAI => {
            let mut openai = OpenAIProvider::new(model, dimension)
                .with_api_key_env(&config.api_key_env)
                .with_base_url(config.base_url.as_str())
                .with_max_tokens(config.max_tokens);
            // An explicit dimension is always forwarded; otherwise the model decides.
            if config.dimension.is_some() {
                openai = openai.with_dimensions_param(true);
            }
            Arc::new(openai)
        }
    };
    Ok(provider)
}
