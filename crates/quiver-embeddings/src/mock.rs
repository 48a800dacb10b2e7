//! Mock embedding provider for deterministic testing.
//!
//! Returns pre-configured vectors without making any HTTP calls.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::provider::EmbeddingProvider;
use quiver_core::{QuiverError, Result};

/// A mock embedding provider that returns queued vectors in order.
///
/// # Example
/// ```
/// use quiver_embeddings::MockEmbedder;
/// let embedder = MockEmbedder::new(3).with_vector(vec![1.0, 0.0, 0.0]);
/// ```
pub struct MockEmbedder {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    /// Track all texts received (for assertions in tests).
    texts: Arc<Mutex<Vec<String>>>,
    /// Returned when the queue is empty; None makes the provider fail.
    default_vector: Option<Vec<f32>>,
    dims: usize,
}

#[derive(Clone)]
enum MockResponse {
    Vector(Vec<f32>),
    Error(String),
}

impl MockEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![])),
            texts: Arc::new(Mutex::new(vec![])),
            default_vector: None,
            dims,
        }
    }

    /// Queue a vector response.
    pub fn with_vector(self, vector: Vec<f32>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Vector(vector));
        self
    }

    /// Queue an error response.
    pub fn with_error(self, error: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Error(error.to_string()));
        self
    }

    /// Vector returned whenever the queue is empty.
    pub fn with_default_vector(mut self, vector: Vec<f32>) -> Self {
        self.default_vector = Some(vector);
        self
    }

    /// All texts this provider was asked to embed.
    pub fn recorded_texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<Vec<f32>> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return match &self.default_vector {
                Some(v) => Ok(v.clone()),
                None => Err(QuiverError::EmbeddingProvider(
                    "mock: no more queued responses".into(),
                )),
            };
        }
        match responses.remove(0) {
            MockResponse::Vector(v) => Ok(v),
            MockResponse::Error(e) => Err(QuiverError::EmbeddingProvider(e)),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut recorded = self.texts.lock().unwrap();
        for t in texts {
            recorded.push((*t).to_string());
        }
        drop(recorded);

        texts.iter().map(|_| self.next_response()).collect()
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "mock"
    }
}
