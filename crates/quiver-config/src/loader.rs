use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::schema::QuiverConfig;

/// Loads the Quiver configuration from disk with env overrides.
pub struct ConfigLoader {
    config: Arc<RwLock<QuiverConfig>>,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > QUIVER_CONFIG env > ~/.quiver/quiver.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("QUIVER_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".quiver")
            .join("quiver.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> quiver_core::Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            toml::from_str::<QuiverConfig>(&raw).map_err(|e| {
                quiver_core::QuiverError::Config(format!(
                    "failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            QuiverConfig::default()
        };

        let config = Self::apply_env_overrides(config);

        // Validate config — log warnings, fail on errors
        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(quiver_core::QuiverError::Config(e));
            }
        }

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    /// Get a read snapshot of the current config.
    pub fn get(&self) -> QuiverConfig {
        self.config.read().clone()
    }

    /// Get a shared reference for subscription.
    pub fn shared(&self) -> Arc<RwLock<QuiverConfig>> {
        Arc::clone(&self.config)
    }

    /// Path the config was loaded from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides (QUIVER_LOG_LEVEL, QUIVER_DB_PATH, etc.)
    fn apply_env_overrides(mut config: QuiverConfig) -> QuiverConfig {
        if let Ok(v) = std::env::var("QUIVER_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Ok(v) = std::env::var("QUIVER_DB_PATH") {
            config.catalog.db_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("QUIVER_EMBEDDING_MODEL") {
            config.embedding.model = v;
        }
        // API key: env var fills in when config file doesn't have the key set.
        // This means config file takes priority, env is the fallback.
        if config.embedding.api_key.is_none() {
            if let Ok(v) = std::env::var("OPENAI_API_KEY") {
                config.embedding.api_key = Some(v);
            }
        }
        config
    }

    /// Reload the config from disk.
    pub fn reload(&self) -> quiver_core::Result<()> {
        if !self.config_path.exists() {
            return Err(quiver_core::QuiverError::Config(format!(
                "config file not found: {}",
                self.config_path.display()
            )));
        }
        let raw = std::fs::read_to_string(&self.config_path)?;
        let new_config = toml::from_str::<QuiverConfig>(&raw).map_err(|e| {
            quiver_core::QuiverError::Config(format!(
                "failed to parse {}: {}",
                self.config_path.display(),
                e
            ))
        })?;
        let new_config = Self::apply_env_overrides(new_config);
        *self.config.write() = new_config;
        info!("configuration reloaded");
        Ok(())
    }
}
