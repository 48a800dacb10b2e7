use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration — maps to `quiver.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuiverConfig {
    pub embedding: EmbeddingConfig,
    pub search: SearchConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

// ── Embedding provider ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider API key.
    /// Can also be set via OPENAI_API_KEY environment variable.
    /// Config file takes priority over environment variable.
    /// When unset, semantic search is disabled and every query answers
    /// through the lexical matcher.
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible embeddings endpoint.
    pub base_url: String,
    /// Embedding model identifier.
    pub model: String,
    /// Output dimensionality of the model (1536 for text-embedding-3-small).
    pub dimensions: usize,
    /// Maximum seconds to wait for the provider before treating it as
    /// unavailable. There is no retry — a single failure falls back.
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".into(),
            model: "text-embedding-3-small".into(),
            dimensions: 1536,
            timeout_secs: 5,
        }
    }
}

// ── Search ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default result limit for workflow searches.
    pub workflow_limit: usize,
    /// Default result limit for skill searches.
    pub skill_limit: usize,
    /// Hard ceiling on caller-supplied limits.
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workflow_limit: 5,
            skill_limit: 10,
            max_limit: 50,
        }
    }
}

// ── Catalog ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the SQLite database.
    pub db_path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("quiver.db"),
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Default for QuiverConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, " ({})", h)?;
        }
        Ok(())
    }
}

impl QuiverConfig {
    /// Validate the config and return a list of warnings/errors.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        if self.embedding.dimensions == 0 {
            warnings.push(ConfigWarning {
                field: "embedding.dimensions".into(),
                message: "must be greater than zero".into(),
                severity: WarningSeverity::Error,
                hint: Some("1536 for text-embedding-3-small".into()),
            });
        }
        if self.embedding.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                field: "embedding.timeout_secs".into(),
                message: "a zero timeout would fail every provider call".into(),
                severity: WarningSeverity::Error,
                hint: None,
            });
        }
        if self.embedding.api_key.is_none() {
            warnings.push(ConfigWarning {
                field: "embedding.api_key".into(),
                message: "no provider credential configured, search will be lexical-only".into(),
                severity: WarningSeverity::Info,
                hint: Some("set OPENAI_API_KEY or embedding.api_key".into()),
            });
        }
        if self.search.workflow_limit == 0 || self.search.skill_limit == 0 {
            warnings.push(ConfigWarning {
                field: "search".into(),
                message: "default result limits must be greater than zero".into(),
                severity: WarningSeverity::Error,
                hint: None,
            });
        }
        if self.search.max_limit < self.search.workflow_limit.max(self.search.skill_limit) {
            warnings.push(ConfigWarning {
                field: "search.max_limit".into(),
                message: "smaller than a default limit, defaults will be clamped".into(),
                severity: WarningSeverity::Warning,
                hint: None,
            });
        }

        let has_errors = warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Error);
        if has_errors {
            let joined = warnings
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(joined);
        }
        Ok(warnings)
    }
}
