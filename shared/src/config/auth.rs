//! Authentication and token configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::utils::duration::parse_duration;

pub const DEFAULT_ISSUER: &str = "user-service";

/// JWT key material locations and token lifetimes
///
/// Tokens are signed with ES256, so the issuer needs the PKCS#8 private key
/// and verifiers need the matching SPKI public key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Path to the PEM-encoded PKCS#8 EC private key
    pub private_key_path: PathBuf,

    /// Path to the PEM-encoded EC public key
    pub public_key_path: PathBuf,

    /// Access token lifetime
    pub access_token_expiry: Duration,

    /// Refresh token lifetime
    pub refresh_token_expiry: Duration,

    /// `iss` claim written into and required from every token
    pub issuer: String,

    /// Clock skew tolerated when checking expiry
    pub leeway: Duration,
}

impl JwtConfig {
    /// Create a configuration with default lifetimes (1h access, 24h refresh)
    pub fn new(private_key_path: impl Into<PathBuf>, public_key_path: impl Into<PathBuf>) -> Self {
        Self {
            private_key_path: private_key_path.into(),
            public_key_path: public_key_path.into(),
            access_token_expiry: Duration::from_secs(3_600),
            refresh_token_expiry: Duration::from_secs(86_400),
            issuer: DEFAULT_ISSUER.to_string(),
            leeway: Duration::ZERO,
        }
    }

    /// Set the access token lifetime
    pub fn with_access_expiry(mut self, expiry: Duration) -> Self {
        self.access_token_expiry = expiry;
        self
    }

    /// Set the refresh token lifetime
    pub fn with_refresh_expiry(mut self, expiry: Duration) -> Self {
        self.refresh_token_expiry = expiry;
        self
    }

    /// Read `JWT_*` variables
    ///
    /// `JWT_PRIVATE_KEY_PATH` and `JWT_PUBLIC_KEY_PATH` are required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let private_key_path = lookup("JWT_PRIVATE_KEY_PATH")
            .filter(|path| !path.trim().is_empty())
            .ok_or_else(|| ConfigError::missing("JWT_PRIVATE_KEY_PATH"))?;
        let public_key_path = lookup("JWT_PUBLIC_KEY_PATH")
            .filter(|path| !path.trim().is_empty())
            .ok_or_else(|| ConfigError::missing("JWT_PUBLIC_KEY_PATH"))?;

        let mut config = Self::new(private_key_path.trim(), public_key_path.trim());

        if let Some(expiry) = lookup("JWT_TOKEN_EXPIRY") {
            config.access_token_expiry =
                parse_duration(&expiry).map_err(|e| ConfigError::invalid("JWT_TOKEN_EXPIRY", e))?;
        }
        if let Some(expiry) = lookup("JWT_REFRESH_EXPIRY") {
            config.refresh_token_expiry = parse_duration(&expiry)
                .map_err(|e| ConfigError::invalid("JWT_REFRESH_EXPIRY", e))?;
        }
        if let Some(issuer) = lookup("JWT_ISSUER") {
            config.issuer = issuer.trim().to_string();
        }
        if let Some(leeway) = lookup("JWT_LEEWAY") {
            config.leeway =
                parse_duration(&leeway).map_err(|e| ConfigError::invalid("JWT_LEEWAY", e))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_expiry.is_zero() {
            return Err(ConfigError::invalid("JWT_TOKEN_EXPIRY", "must be greater than zero"));
        }
        if self.refresh_token_expiry < self.access_token_expiry {
            return Err(ConfigError::invalid(
                "JWT_REFRESH_EXPIRY",
                "must not be shorter than the access token expiry",
            ));
        }
        if self.issuer.is_empty() {
            return Err(ConfigError::invalid("JWT_ISSUER", "must not be empty"));
        }
        if self.leeway >= self.access_token_expiry {
            return Err(ConfigError::invalid(
                "JWT_LEEWAY",
                "must be shorter than the access token expiry",
            ));
        }
        Ok(())
    }
}
