//! Token claim entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::{Identity, Role};

/// Token type reported alongside issued tokens
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Which verification path a token was minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenUse::Access => f.write_str("access"),
            TokenUse::Refresh => f.write_str("refresh"),
        }
    }
}

/// Claims carried by an access token
///
/// `role` is always `Role::from_courier_flag(is_courier)`; `is_courier` is
/// kept for clients that key off it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (identity ID)
    #[serde(rename = "sub")]
    pub subject_id: String,

    pub email: String,

    pub role: Role,

    pub is_courier: bool,

    pub token_use: TokenUse,

    #[serde(rename = "iss")]
    pub issuer: String,

    /// JWT ID (unique per token)
    #[serde(rename = "jti")]
    pub token_id: String,

    /// Issued at, seconds since the Unix epoch
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration, seconds since the Unix epoch
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl AccessTokenClaims {
    /// Creates access token claims for `identity`, valid for `ttl` from `now`
    ///
    /// Returns `None` when `now + ttl` falls outside the representable range.
    pub fn new(identity: &Identity, issuer: &str, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;
        Some(Self {
            subject_id: identity.id.clone(),
            email: identity.email.clone(),
            role: identity.role(),
            is_courier: identity.is_courier,
            token_use: TokenUse::Access,
            issuer: issuer.to_string(),
            token_id: Uuid::new_v4().to_string(),
            issued_at: now.timestamp(),
            expires_at: expires_at.timestamp(),
        })
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.issued_at, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expires_at, 0).single()
    }

    /// Time between issuance and expiry
    pub fn lifetime(&self) -> Duration {
        Duration::seconds(self.expires_at - self.issued_at)
    }

    /// Whether the claims are expired at `now`, tolerating `leeway` seconds of skew
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: i64) -> bool {
        now.timestamp() >= self.expires_at + leeway
    }

    /// Whether `role` agrees with `is_courier`
    pub fn role_is_consistent(&self) -> bool {
        self.role == Role::from_courier_flag(self.is_courier)
    }
}

/// Claims carried by a refresh token
///
/// Carries no role information: refresh tokens only mint new access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    #[serde(rename = "sub")]
    pub subject_id: String,

    pub email: String,

    pub token_use: TokenUse,

    #[serde(rename = "iss")]
    pub issuer: String,

    #[serde(rename = "jti")]
    pub token_id: String,

    #[serde(rename = "iat")]
    pub issued_at: i64,

    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl RefreshTokenClaims {
    pub fn new(identity: &Identity, issuer: &str, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;
        Some(Self {
            subject_id: identity.id.clone(),
            email: identity.email.clone(),
            token_use: TokenUse::Refresh,
            issuer: issuer.to_string(),
            token_id: Uuid::new_v4().to_string(),
            issued_at: now.timestamp(),
            expires_at: expires_at.timestamp(),
        })
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.issued_at, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expires_at, 0).single()
    }

    pub fn lifetime(&self) -> Duration {
        Duration::seconds(self.expires_at - self.issued_at)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway: i64) -> bool {
        now.timestamp() >= self.expires_at + leeway
    }
}

/// Access and refresh token issued together for one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `"Bearer"`
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
        }
    }
}
