//! # quiver-config
//!
//! Configuration system for the Quiver catalog. Reads from `quiver.toml`
//! and environment variables — in that precedence order.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    CatalogConfig, ConfigWarning, EmbeddingConfig, LoggingConfig, QuiverConfig, SearchConfig,
    WarningSeverity,
};

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber from [`LoggingConfig`].
///
/// `RUST_LOG` takes priority over the configured level. Safe to call
/// more than once — later calls are no-ops.
pub fn init_tracing(config: &schema::LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.try_init(),
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already initialized");
    }
}
