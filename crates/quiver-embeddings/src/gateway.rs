use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use quiver_config::EmbeddingConfig;

use crate::provider::{EmbeddingProvider, OpenAiEmbedding};

/// The one boundary between search and the embedding model.
///
/// Normalizes the query, bounds the provider call with a timeout, and
/// maps every failure — no credential, transport error, timeout,
/// malformed or empty response — to `None`. Nothing escapes this type
/// as an error: search must always produce *some* answer, so callers
/// treat `None` as "take the lexical path", never as a request failure.
pub struct EmbeddingGateway {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    timeout: Duration,
}

impl EmbeddingGateway {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
        }
    }

    /// A gateway with no provider — every query answers `None`.
    /// Used when no credential is configured.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            timeout: Duration::from_secs(1),
        }
    }

    /// Build from config: a missing API key yields a disabled gateway.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        match &config.api_key {
            Some(key) => {
                let provider = OpenAiEmbedding::new(key.clone())
                    .with_model(config.model.clone(), config.dimensions)
                    .with_base_url(config.base_url.clone());
                Self::new(Arc::new(provider), Duration::from_secs(config.timeout_secs))
            }
            None => Self::disabled(),
        }
    }

    /// Whether a provider is configured at all. When false, callers can
    /// skip straight to the lexical path without issuing a call.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Embed a free-text query, or signal "no embedding".
    ///
    /// The query is trimmed and lower-cased first so repeated queries
    /// differing only in case produce consistent vectors.
    pub async fn embed_query(&self, query: &str) -> Option<Vec<f32>> {
        let provider = self.provider.as_ref()?;

        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            debug!("empty query, skipping embedding");
            return None;
        }

        let inputs = [normalized.as_str()];
        let call = provider.embed(&inputs);
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(r) => r,
            Err(_) => {
                warn!(provider = provider.name(), timeout = ?self.timeout, "embedding call timed out");
                return None;
            }
        };

        match result {
            Ok(mut vectors) if !vectors.is_empty() => {
                let vector = vectors.swap_remove(0);
                if vector.is_empty() {
                    warn!(provider = provider.name(), "provider returned an empty vector");
                    None
                } else {
                    Some(vector)
                }
            }
            Ok(_) => {
                warn!(provider = provider.name(), "provider returned no vectors");
                None
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "embedding call failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockEmbedder;

    fn gateway(embedder: MockEmbedder) -> EmbeddingGateway {
        EmbeddingGateway::new(Arc::new(embedder), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn returns_vector_on_success() {
        let gw = gateway(MockEmbedder::new(3).with_vector(vec![0.1, 0.2, 0.3]));
        assert_eq!(gw.embed_query("Refactor").await, Some(vec![0.1, 0.2, 0.3]));
    }

    #[tokio::test]
    async fn normalizes_query_before_sending() {
        let embedder = Arc::new(MockEmbedder::new(2).with_default_vector(vec![1.0, 0.0]));
        let gw = EmbeddingGateway::new(embedder.clone(), Duration::from_secs(1));
        let _ = gw.embed_query("  ReFactor THE Parser  ").await;
        assert_eq!(embedder.recorded_texts(), vec!["refactor the parser"]);
    }

    #[tokio::test]
    async fn provider_error_maps_to_none() {
        let gw = gateway(MockEmbedder::new(3).with_error("HTTP 500"));
        assert_eq!(gw.embed_query("query").await, None);
    }

    #[tokio::test]
    async fn empty_query_maps_to_none() {
        let gw = gateway(MockEmbedder::new(3).with_default_vector(vec![1.0]));
        assert_eq!(gw.embed_query("   ").await, None);
    }

    #[tokio::test]
    async fn disabled_gateway_answers_none() {
        let gw = EmbeddingGateway::disabled();
        assert!(!gw.is_configured());
        assert_eq!(gw.embed_query("anything").await, None);
    }

    #[tokio::test]
    async fn from_config_without_key_is_disabled() {
        let config = EmbeddingConfig::default();
        let gw = EmbeddingGateway::from_config(&config);
        assert!(!gw.is_configured());
    }

    #[tokio::test]
    async fn from_config_with_key_is_configured() {
        let config = EmbeddingConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        let gw = EmbeddingGateway::from_config(&config);
        assert!(gw.is_configured());
    }
}
