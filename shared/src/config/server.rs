//! Server configuration module

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::utils::duration::parse_duration;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Bind attempts before giving up (at least 1)
    pub max_retries: u32,

    /// Pause between bind attempts
    pub retry_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            max_retries: 5,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Read `HTTP_SERVER_*` variables on top of the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HTTP_SERVER_HOST") {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup("HTTP_SERVER_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("HTTP_SERVER_PORT", format!("{}", e)))?;
        }
        if let Some(retries) = lookup("HTTP_SERVER_MAX_RETRIES") {
            config.max_retries = retries
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("HTTP_SERVER_MAX_RETRIES", format!("{}", e)))?;
        }
        if let Some(delay) = lookup("HTTP_SERVER_RETRY_DELAY") {
            config.retry_delay = parse_duration(&delay)
                .map_err(|e| ConfigError::invalid("HTTP_SERVER_RETRY_DELAY", e))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::invalid("HTTP_SERVER_HOST", "must not be empty"));
        }
        if self.port == 0 {
            return Err(ConfigError::invalid("HTTP_SERVER_PORT", "must be between 1 and 65535"));
        }
        if self.max_retries < 1 {
            return Err(ConfigError::invalid("HTTP_SERVER_MAX_RETRIES", "must be at least 1"));
        }
        if self.retry_delay < Duration::from_secs(1) {
            return Err(ConfigError::invalid("HTTP_SERVER_RETRY_DELAY", "must be at least 1s"));
        }
        Ok(())
    }

    /// Get the bind address as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
