//! Configuration module with business-specific sub-modules
//!
//! Every value object is built by an explicit constructor that validates its
//! inputs, so a successfully loaded `AppConfig` is known to be usable:
//! - `auth` - Token key material and lifetimes
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server bind configuration

pub mod auth;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use environment::{Environment, LogFormat, LogOutput, LogTimestamp, LoggingConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Token configuration
    pub jwt: JwtConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup)?;

        Ok(Self {
            environment,
            server: ServerConfig::from_lookup(&lookup)?,
            jwt: JwtConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(environment, &lookup)?,
        })
    }
}
