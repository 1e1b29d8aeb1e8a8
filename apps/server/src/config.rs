//! Server configuration.
//!
//! Loaded from environment variables with fallback to defaults.

use std::env;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,

    /// Path to the SQLite database file.
    pub db_path: String,

    /// Upper bound on a posting transaction. On expiry the request
    /// fails closed: the transaction is dropped and rolls back.
    pub post_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let post_timeout_ms: u64 = env::var("TALLY_POST_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("TALLY_POST_TIMEOUT_MS".to_string()))?;

        Ok(ServerConfig {
            bind_addr: env::var("TALLY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string()),
            db_path: env::var("TALLY_DB_PATH").unwrap_or_else(|_| "./tally.db".to_string()),
            post_timeout: Duration::from_millis(post_timeout_ms),
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only assert on variables this test doesn't set; the defaults
        // must parse
        let config = ServerConfig::load().unwrap();
        assert!(!config.bind_addr.is_empty());
        assert!(!config.db_path.is_empty());
        assert!(config.post_timeout > Duration::ZERO);
    }
}
