//! Token issuance and verification facade

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use us_shared::JwtConfig;

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::{AccessTokenClaims, RefreshTokenClaims, TokenPair};
use crate::errors::{TokenError, TokenResult};

use super::clock::{Clock, SystemClock};
use super::config::TokenManagerConfig;
use super::key_manager::{Es256KeyManager, TOKEN_ALGORITHM};
use super::verifier::TokenVerifier;

/// Issues ES256-signed access and refresh tokens and verifies them
///
/// Immutable after construction, so a single instance can be shared
/// behind an `Arc` or cloned into every worker.
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    header: Header,
    config: TokenManagerConfig,
    verifier: TokenVerifier,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("config", &self.config)
            .field("verifier", &self.verifier)
            .finish()
    }
}

impl TokenManager {
    /// Creates a token manager that reads wall-clock time
    pub fn new(keys: Es256KeyManager, config: TokenManagerConfig) -> Self {
        Self::with_clock(keys, config, Arc::new(SystemClock))
    }

    /// Creates a token manager with an explicit time source
    pub fn with_clock(keys: Es256KeyManager, config: TokenManagerConfig, clock: Arc<dyn Clock>) -> Self {
        let verifier = TokenVerifier::new(keys.decoding_key().clone(), &config, Arc::clone(&clock));

        Self {
            encoding_key: keys.encoding_key().clone(),
            header: Header::new(TOKEN_ALGORITHM),
            config,
            verifier,
            clock,
        }
    }

    /// Creates a token manager from PEM strings
    ///
    /// # Errors
    ///
    /// `TokenError::Configuration` if either key is malformed or the two
    /// keys do not belong together.
    pub fn from_pem(
        private_key_pem: &str,
        public_key_pem: &str,
        config: TokenManagerConfig,
    ) -> TokenResult<Self> {
        let keys = Es256KeyManager::from_pem(private_key_pem, public_key_pem)?;
        Ok(Self::new(keys, config))
    }

    /// Creates a token manager from the application's JWT settings
    pub fn from_jwt_config(jwt: &JwtConfig) -> TokenResult<Self> {
        let keys = Es256KeyManager::from_jwt_config(jwt)?;
        let config = TokenManagerConfig::from_jwt_config(jwt)?;
        Ok(Self::new(keys, config))
    }

    /// Issues a signed access token for `identity`
    ///
    /// The token carries the subject ID, email, courier flag and derived
    /// role, and expires one access lifetime after issuance.
    pub fn issue_access_token(&self, identity: &Identity) -> TokenResult<String> {
        self.access_token_at(identity, self.clock.now())
    }

    /// Issues a signed refresh token for `identity`
    pub fn issue_refresh_token(&self, identity: &Identity) -> TokenResult<String> {
        self.refresh_token_at(identity, self.clock.now())
    }

    /// Issues both tokens against a single reading of the clock
    pub fn issue_token_pair(&self, identity: &Identity) -> TokenResult<TokenPair> {
        let now = self.clock.now();
        let access_token = self.access_token_at(identity, now)?;
        let refresh_token = self.refresh_token_at(identity, now)?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_ttl().num_seconds(),
        ))
    }

    /// Verifies an access token, see [`TokenVerifier::verify_access_token`]
    pub fn verify_access_token(&self, token: &str) -> TokenResult<AccessTokenClaims> {
        self.verifier.verify_access_token(token)
    }

    /// Verifies a refresh token, see [`TokenVerifier::verify_refresh_token`]
    pub fn verify_refresh_token(&self, token: &str) -> TokenResult<RefreshTokenClaims> {
        self.verifier.verify_refresh_token(token)
    }

    /// Verify-only handle sharing this manager's public key and clock
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    pub fn config(&self) -> &TokenManagerConfig {
        &self.config
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        self.config.access_token_ttl()
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        self.config.refresh_token_ttl()
    }

    fn access_token_at(&self, identity: &Identity, now: DateTime<Utc>) -> TokenResult<String> {
        let claims = AccessTokenClaims::new(
            identity,
            self.config.issuer(),
            now,
            self.config.access_token_ttl(),
        )
        .ok_or_else(|| expiry_out_of_range(now))?;
        self.sign(&claims)
    }

    fn refresh_token_at(&self, identity: &Identity, now: DateTime<Utc>) -> TokenResult<String> {
        let claims = RefreshTokenClaims::new(
            identity,
            self.config.issuer(),
            now,
            self.config.refresh_token_ttl(),
        )
        .ok_or_else(|| expiry_out_of_range(now))?;
        self.sign(&claims)
    }

    fn sign<C: Serialize>(&self, claims: &C) -> TokenResult<String> {
        encode(&self.header, claims, &self.encoding_key).map_err(|e| TokenError::TokenGenerationFailed {
            message: e.to_string(),
        })
    }
}

fn expiry_out_of_range(now: DateTime<Utc>) -> TokenError {
    TokenError::TokenGenerationFailed {
        message: format!("token expiry is not representable when issued at {}", now),
    }
}
