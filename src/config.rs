//! # Configuration Management
//!
//! Centralized configuration for query sessions.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`
//!
//! Timeouts are enforced by the transport. The codec itself never waits.

use crate::error::{QueryError, Result};
use crate::utils::timeout;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Largest datagram a Source server sends without splitting
pub const MAX_DATAGRAM_SIZE: usize = 1400;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct QueryConfig {
    /// Client-side socket configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl QueryConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| QueryError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| QueryError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| QueryError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("SOURCE_QUERY_LOCAL_ADDRESS") {
            config.client.local_address = addr;
        }

        if let Ok(ms) = std::env::var("SOURCE_QUERY_SEND_TIMEOUT_MS") {
            let val = ms.parse::<u64>().map_err(|e| {
                QueryError::ConfigError(format!("SOURCE_QUERY_SEND_TIMEOUT_MS: {e}"))
            })?;
            config.client.send_timeout = Duration::from_millis(val);
        }

        if let Ok(ms) = std::env::var("SOURCE_QUERY_RECEIVE_TIMEOUT_MS") {
            let val = ms.parse::<u64>().map_err(|e| {
                QueryError::ConfigError(format!("SOURCE_QUERY_RECEIVE_TIMEOUT_MS: {e}"))
            })?;
            config.client.receive_timeout = Duration::from_millis(val);
        }

        if let Ok(level) = std::env::var("SOURCE_QUERY_LOG_LEVEL") {
            config.logging.log_level = level
                .parse::<Level>()
                .map_err(|_| QueryError::ConfigError(format!("Invalid log level: {level}")))?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Validate the configuration for common misconfigurations.
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.client.validate();
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(QueryError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Client socket configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Local address the UDP socket binds to (e.g., "0.0.0.0:0")
    pub local_address: String,

    /// Maximum time a datagram send may take
    #[serde(with = "duration_serde")]
    pub send_timeout: Duration,

    /// Maximum time to wait for a response datagram
    #[serde(with = "duration_serde")]
    pub receive_timeout: Duration,

    /// Receive buffer size; longer datagrams are truncated by the OS
    pub max_datagram_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            local_address: String::from("0.0.0.0:0"),
            send_timeout: timeout::DEFAULT_SEND_TIMEOUT,
            receive_timeout: timeout::DEFAULT_RECEIVE_TIMEOUT,
            max_datagram_size: MAX_DATAGRAM_SIZE,
        }
    }
}

impl ClientConfig {
    /// Validate client configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.local_address.is_empty() {
            errors.push("Local address cannot be empty".to_string());
        } else if self.local_address.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!(
                "Invalid local address format: '{}' (expected format: '0.0.0.0:0')",
                self.local_address
            ));
        }

        if self.send_timeout.as_millis() < 10 {
            errors.push("Send timeout too short (minimum: 10ms)".to_string());
        } else if self.send_timeout.as_secs() > 300 {
            errors.push("Send timeout too long (maximum: 300s)".to_string());
        }

        if self.receive_timeout.as_millis() < 10 {
            errors.push("Receive timeout too short (minimum: 10ms)".to_string());
        } else if self.receive_timeout.as_secs() > 300 {
            errors.push("Receive timeout too long (maximum: 300s)".to_string());
        }

        // header plus a one-byte count is the smallest useful response
        if self.max_datagram_size < 6 {
            errors.push("Max datagram size too small (minimum: 6 bytes)".to_string());
        } else if self.max_datagram_size > 65_507 {
            errors.push(format!(
                "Max datagram size too large: {} (maximum UDP payload: 65507)",
                self.max_datagram_size
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("source-query"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for Duration serialization/deserialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
