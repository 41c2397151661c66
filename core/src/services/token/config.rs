//! Configuration for the token manager

use chrono::Duration;
use us_shared::config::auth::DEFAULT_ISSUER;
use us_shared::JwtConfig;

use crate::errors::TokenError;

/// Longest lifetime accepted for either token kind, in days
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 366;

/// Lifetimes and validation rules, fixed for the life of a `TokenManager`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenManagerConfig {
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    issuer: String,
    leeway: Duration,
}

impl TokenManagerConfig {
    /// Creates a validated configuration
    ///
    /// Both lifetimes must be positive and the refresh lifetime must not be
    /// shorter than the access lifetime.
    pub fn new(access_token_ttl: Duration, refresh_token_ttl: Duration) -> Result<Self, TokenError> {
        let config = Self {
            access_token_ttl,
            refresh_token_ttl,
            issuer: DEFAULT_ISSUER.to_string(),
            leeway: Duration::zero(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the `iss` claim written into and required from tokens
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Result<Self, TokenError> {
        self.issuer = issuer.into();
        self.validate()?;
        Ok(self)
    }

    /// Tolerate clock skew between issuer and verifier
    pub fn with_leeway(mut self, leeway: Duration) -> Result<Self, TokenError> {
        self.leeway = leeway;
        self.validate()?;
        Ok(self)
    }

    /// Builds the configuration from the application's JWT settings
    pub fn from_jwt_config(jwt: &JwtConfig) -> Result<Self, TokenError> {
        Self::new(
            to_chrono(jwt.access_token_expiry, "access token expiry")?,
            to_chrono(jwt.refresh_token_expiry, "refresh token expiry")?,
        )?
        .with_issuer(jwt.issuer.clone())?
        .with_leeway(to_chrono(jwt.leeway, "leeway")?)
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    fn validate(&self) -> Result<(), TokenError> {
        if self.access_token_ttl <= Duration::zero() {
            return Err(TokenError::configuration(
                "access token lifetime must be positive",
            ));
        }
        if self.refresh_token_ttl <= Duration::zero() {
            return Err(TokenError::configuration(
                "refresh token lifetime must be positive",
            ));
        }
        if self.refresh_token_ttl > Duration::days(MAX_TOKEN_LIFETIME_DAYS) {
            return Err(TokenError::configuration(format!(
                "refresh token lifetime must not exceed {} days",
                MAX_TOKEN_LIFETIME_DAYS
            )));
        }
        if self.refresh_token_ttl < self.access_token_ttl {
            return Err(TokenError::configuration(
                "refresh token lifetime must not be shorter than access token lifetime",
            ));
        }
        if self.issuer.trim().is_empty() {
            return Err(TokenError::configuration("issuer must not be empty"));
        }
        if self.leeway < Duration::zero() || self.leeway >= self.access_token_ttl {
            return Err(TokenError::configuration(
                "leeway must be non-negative and shorter than the access token lifetime",
            ));
        }
        Ok(())
    }
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::hours(1),
            refresh_token_ttl: Duration::hours(24),
            issuer: DEFAULT_ISSUER.to_string(),
            leeway: Duration::zero(),
        }
    }
}

fn to_chrono(duration: std::time::Duration, what: &str) -> Result<Duration, TokenError> {
    Duration::from_std(duration)
        .map_err(|_| TokenError::configuration(format!("{} is out of range", what)))
}
