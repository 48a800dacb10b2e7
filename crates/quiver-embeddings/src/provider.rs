use async_trait::async_trait;
use quiver_core::{QuiverError, Result};
use tracing::debug;

/// Trait for generating text embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// The dimensionality of the output embeddings.
    fn dimensions(&self) -> usize;

    /// Provider name.
    fn name(&self) -> &str;
}

/// OpenAI-compatible embeddings provider (text-embedding-3-small,
/// text-embedding-3-large, or any endpoint speaking the same protocol).
pub struct OpenAiEmbedding {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dims: usize,
}

impl OpenAiEmbedding {
    /// Create a provider with text-embedding-3-small (1536 dims).
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: "https://api.openai.com/v1".into(),
            model: "text-embedding-3-small".into(),
            dims: 1536,
        }
    }

    /// Use a specific model (e.g. "text-embedding-3-large" with 3072 dims).
    pub fn with_model(mut self, model: String, dims: usize) -> Self {
        self.model = model;
        self.dims = dims;
        self
    }

    /// Use a custom base URL (e.g. for Azure OpenAI or a local gateway).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedding {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(model = %self.model, count = texts.len(), "generating embeddings");

        let body = serde_json::json!({
            "model": &self.model,
            "input": texts,
        });

        let resp = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| QuiverError::EmbeddingProvider(format!("embedding request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(QuiverError::EmbeddingProvider(format!(
                "embedding HTTP {}: {}",
                status, text
            )));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| QuiverError::EmbeddingMalformed(format!("embedding parse error: {}", e)))?;

        let items = data["data"]
            .as_array()
            .ok_or_else(|| QuiverError::EmbeddingMalformed("response has no data array".into()))?;

        let embeddings: Vec<Vec<f32>> = items
            .iter()
            .filter_map(|item| {
                item["embedding"].as_array().map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect::<Vec<f32>>()
                })
            })
            .filter(|v: &Vec<f32>| !v.is_empty())
            .collect();

        if embeddings.len() != texts.len() {
            return Err(QuiverError::EmbeddingMalformed(format!(
                "requested {} embeddings, response carried {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "openai"
    }
}
