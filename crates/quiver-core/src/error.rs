use thiserror::Error;

/// Unified error type for the Quiver workspace.
#[derive(Error, Debug)]
pub enum QuiverError {
    // ── Catalog / persistence errors ───────────────────────────
    #[error("catalog error: {0}")]
    Catalog(String),

    // ── Embedding provider errors ──────────────────────────────
    #[error("embedding provider error: {0}")]
    EmbeddingProvider(String),

    #[error("embedding response malformed: {0}")]
    EmbeddingMalformed(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, QuiverError>;
