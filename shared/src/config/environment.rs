//! Environment configuration module

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging/test environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Resolve the environment from `ENVIRONMENT` or `ENV`, defaulting to development
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (key, value) = match lookup("ENVIRONMENT") {
            Some(value) => ("ENVIRONMENT", value),
            None => match lookup("ENV") {
                Some(value) => ("ENV", value),
                None => return Ok(Environment::default()),
            },
        };

        value.parse().map_err(|e| ConfigError::invalid(key, e))
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "console" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Where log lines are written
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Appended to the file at this path
    File(PathBuf),
}

/// Timestamp written at the start of each log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTimestamp {
    /// Wall-clock time, RFC 3339
    #[default]
    Rfc3339,
    /// Time since the process started
    Uptime,
    /// No timestamp, for collectors that stamp lines themselves
    None,
}

impl std::str::FromStr for LogTimestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rfc3339" | "system" => Ok(LogTimestamp::Rfc3339),
            "uptime" => Ok(LogTimestamp::Uptime),
            "none" | "off" => Ok(LogTimestamp::None),
            _ => Err(format!("Invalid log timestamp: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: LogFormat,

    /// Include source file and line in logs
    #[serde(default)]
    pub source_location: bool,

    #[serde(default)]
    pub output: LogOutput,

    #[serde(default)]
    pub timestamp: LogTimestamp,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Create logging config for environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
                source_location: true,
                output: LogOutput::Stdout,
                timestamp: LogTimestamp::Uptime,
            },
            Environment::Staging => Self {
                level: String::from("info"),
                format: LogFormat::Json,
                source_location: false,
                output: LogOutput::Stdout,
                timestamp: LogTimestamp::Rfc3339,
            },
            Environment::Production => Self {
                level: String::from("info"),
                format: LogFormat::Json,
                source_location: false,
                output: LogOutput::Stdout,
                timestamp: LogTimestamp::Rfc3339,
            },
        }
    }

    /// Environment defaults overridden by `LOG_LEVEL`, `LOG_FORMAT`,
    /// `LOG_OUTPUT`, `LOG_FILE` and `LOG_TIMESTAMP`
    ///
    /// `LOG_OUTPUT` is `stdout`, `stderr` or `file`; `file` needs `LOG_FILE`.
    /// Setting `LOG_FILE` alone also selects file output.
    pub fn from_lookup<F>(env: Environment, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::for_environment(env);

        if let Some(level) = lookup("LOG_LEVEL") {
            config.level = level.trim().to_lowercase();
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.format = format
                .parse()
                .map_err(|e| ConfigError::invalid("LOG_FORMAT", e))?;
        }
        if let Some(timestamp) = lookup("LOG_TIMESTAMP") {
            config.timestamp = timestamp
                .parse()
                .map_err(|e| ConfigError::invalid("LOG_TIMESTAMP", e))?;
        }

        let file = lookup("LOG_FILE").filter(|path| !path.trim().is_empty());
        match (lookup("LOG_OUTPUT"), file) {
            (None, None) => {}
            (None, Some(path)) => config.output = LogOutput::File(PathBuf::from(path.trim())),
            (Some(output), file) => {
                config.output = match output.trim().to_lowercase().as_str() {
                    "stdout" => LogOutput::Stdout,
                    "stderr" => LogOutput::Stderr,
                    "file" => LogOutput::File(PathBuf::from(
                        file.ok_or_else(|| ConfigError::missing("LOG_FILE"))?.trim(),
                    )),
                    _ => {
                        return Err(ConfigError::invalid(
                            "LOG_OUTPUT",
                            format!("expected stdout, stderr or file, got '{}'", output),
                        ))
                    }
                };
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(ConfigError::invalid(
                "LOG_LEVEL",
                format!("expected one of {}, got '{}'", LOG_LEVELS.join(", "), self.level),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("invalid".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_lookup_precedence() {
        let env = Environment::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("ENV", "development"),
        ]))
        .unwrap();
        assert!(env.is_production());

        let env = Environment::from_lookup(lookup_from(&[])).unwrap();
        assert!(env.is_development());

        let err = Environment::from_lookup(lookup_from(&[("ENV", "moon")])).unwrap_err();
        assert_eq!(err.key(), "ENV");
    }

    #[test]
    fn test_logging_config_for_environment() {
        let dev_log = LoggingConfig::for_environment(Environment::Development);
        assert_eq!(dev_log.level, "debug");
        assert_eq!(dev_log.format, LogFormat::Pretty);
        assert!(dev_log.source_location);

        let prod_log = LoggingConfig::for_environment(Environment::Production);
        assert_eq!(prod_log.level, "info");
        assert_eq!(prod_log.format, LogFormat::Json);
        assert!(!prod_log.source_location);
    }

    #[test]
    fn test_logging_overrides() {
        let config = LoggingConfig::from_lookup(
            Environment::Production,
            lookup_from(&[("LOG_LEVEL", "WARN"), ("LOG_FORMAT", "compact")]),
        )
        .unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.output, LogOutput::Stdout);
        assert_eq!(config.timestamp, LogTimestamp::Rfc3339);
    }

    #[test]
    fn test_logging_output_and_timestamp() {
        let config = LoggingConfig::from_lookup(
            Environment::Production,
            lookup_from(&[("LOG_OUTPUT", "Stderr"), ("LOG_TIMESTAMP", "none")]),
        )
        .unwrap();
        assert_eq!(config.output, LogOutput::Stderr);
        assert_eq!(config.timestamp, LogTimestamp::None);

        let config = LoggingConfig::from_lookup(
            Environment::Production,
            lookup_from(&[("LOG_OUTPUT", "file"), ("LOG_FILE", "/var/log/us/api.log")]),
        )
        .unwrap();
        assert_eq!(config.output, LogOutput::File(PathBuf::from("/var/log/us/api.log")));

        let config = LoggingConfig::from_lookup(
            Environment::Development,
            lookup_from(&[("LOG_FILE", "logs/api.log")]),
        )
        .unwrap();
        assert_eq!(config.output, LogOutput::File(PathBuf::from("logs/api.log")));
        assert_eq!(config.timestamp, LogTimestamp::Uptime);
    }

    #[test]
    fn test_logging_output_errors() {
        let err = LoggingConfig::from_lookup(
            Environment::Production,
            lookup_from(&[("LOG_OUTPUT", "file")]),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::missing("LOG_FILE"));

        let err = LoggingConfig::from_lookup(
            Environment::Production,
            lookup_from(&[("LOG_OUTPUT", "syslog")]),
        )
        .unwrap_err();
        assert_eq!(err.key(), "LOG_OUTPUT");

        let err = LoggingConfig::from_lookup(
            Environment::Production,
            lookup_from(&[("LOG_TIMESTAMP", "local")]),
        )
        .unwrap_err();
        assert_eq!(err.key(), "LOG_TIMESTAMP");
    }

    #[test]
    fn test_logging_rejects_unknown_level() {
        let err = LoggingConfig::from_lookup(
            Environment::Development,
            lookup_from(&[("LOG_LEVEL", "verbose")]),
        )
        .unwrap_err();
        assert_eq!(err.key(), "LOG_LEVEL");
    }
}
