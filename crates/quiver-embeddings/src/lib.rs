//! # quiver-embeddings
//!
//! The embedding provider gateway for Quiver search. Wraps one outbound
//! call to an external embedding model and normalizes every failure —
//! missing credential, transport error, timeout, malformed response —
//! into a single "no embedding" signal so the search path can fall back
//! instead of erroring out.

pub mod gateway;
pub mod mock;
pub mod provider;

pub use gateway::EmbeddingGateway;
pub use mock::MockEmbedder;
pub use provider::{EmbeddingProvider, OpenAiEmbedding};
