//! Shared utilities and common types for the user service
//!
//! This crate provides functionality used across the server crates:
//! - Typed, validated configuration loaded from the environment
//! - Error types and the JSON error response body
//! - Duration parsing for configuration values

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, JwtConfig, LogFormat, LogOutput, LogTimestamp, LoggingConfig, ServerConfig,
};
pub use errors::{error_codes, ConfigError, ErrorResponse};
pub use utils::duration::parse_duration;
