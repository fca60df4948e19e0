//! Structured logging setup.
//!
//! The library only emits `tracing` events. Applications that want them on a
//! console call [`init_logging`] once at startup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{QueryError, Result};

/// Install a global subscriber configured from `config`.
///
/// `RUST_LOG` takes precedence over the configured level when set.
/// Fails if a global subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if config.json_format {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };

    installed.map_err(|e| QueryError::ConfigError(format!("Failed to install logger: {e}")))?;
    tracing::debug!(app = %config.app_name, "Logging initialized");
    Ok(())
}
