//! Stateless token verification against the ES256 public key

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::entities::token::{AccessTokenClaims, RefreshTokenClaims, TokenUse};
use crate::errors::TokenError;

use super::clock::{Clock, SystemClock};
use super::config::TokenManagerConfig;
use super::key_manager::TOKEN_ALGORITHM;

/// Raw ECDSA P-256 signature length in a JWS (r || s)
const ES256_SIGNATURE_LEN: usize = 64;

/// Claims that can come out of `TokenVerifier::verify`
trait VerifiableClaims: DeserializeOwned {
    const EXPECTED_USE: TokenUse;

    fn token_use(&self) -> TokenUse;

    fn is_expired_at(&self, now: DateTime<Utc>, leeway: i64) -> bool;

    fn check_consistency(&self) -> Result<(), TokenError> {
        Ok(())
    }
}

impl VerifiableClaims for AccessTokenClaims {
    const EXPECTED_USE: TokenUse = TokenUse::Access;

    fn token_use(&self) -> TokenUse {
        self.token_use
    }

    fn is_expired_at(&self, now: DateTime<Utc>, leeway: i64) -> bool {
        AccessTokenClaims::is_expired_at(self, now, leeway)
    }

    fn check_consistency(&self) -> Result<(), TokenError> {
        if self.role_is_consistent() {
            Ok(())
        } else {
            Err(TokenError::invalid_claims(format!(
                "role `{}` contradicts is_courier={}",
                self.role, self.is_courier
            )))
        }
    }
}

impl VerifiableClaims for RefreshTokenClaims {
    const EXPECTED_USE: TokenUse = TokenUse::Refresh;

    fn token_use(&self) -> TokenUse {
        self.token_use
    }

    fn is_expired_at(&self, now: DateTime<Utc>, leeway: i64) -> bool {
        RefreshTokenClaims::is_expired_at(self, now, leeway)
    }
}

/// Verifies tokens with the public key only
///
/// Cheap to clone and safe to share across threads; hand it to any
/// component that must check tokens but must not mint them.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &TOKEN_ALGORITHM)
            .field("issuer", &self.validation.iss)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("clock", &self.clock)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(decoding_key: DecodingKey, config: &TokenManagerConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is checked against the injected clock after decoding.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

        Self {
            decoding_key,
            validation,
            leeway_seconds: config.leeway().num_seconds(),
            clock,
        }
    }

    /// Builds a verify-only instance from a PEM public key, using wall-clock time
    pub fn from_public_pem(public_key_pem: &str, config: &TokenManagerConfig) -> Result<Self, TokenError> {
        let decoding_key = super::key_manager::Es256KeyManager::verifier_key(public_key_pem)?;
        Ok(Self::new(decoding_key, config, Arc::new(SystemClock)))
    }

    /// Verifies an access token and returns its claims
    ///
    /// # Errors
    ///
    /// * `InvalidTokenFormat` - not a well-formed ES256 token, or claims of the wrong shape
    /// * `AlgorithmMismatch` - header declares an algorithm other than ES256
    /// * `InvalidSignature` - signature does not verify against the public key
    /// * `InvalidClaims` - wrong issuer, a refresh token, or an inconsistent role
    /// * `TokenExpired` - everything checks out but `exp` has passed
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        self.verify(token)
    }

    /// Verifies a refresh token and returns its claims
    ///
    /// Same contract as [`TokenVerifier::verify_access_token`]; access tokens
    /// are rejected with `InvalidClaims`.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshTokenClaims, TokenError> {
        self.verify(token)
    }

    fn verify<C: VerifiableClaims>(&self, token: &str) -> Result<C, TokenError> {
        inspect_structure(token)?;

        let claims = decode::<C>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?
            .claims;

        if claims.token_use() != C::EXPECTED_USE {
            return Err(TokenError::invalid_claims(format!(
                "expected {} token, found {} token",
                C::EXPECTED_USE,
                claims.token_use()
            )));
        }
        claims.check_consistency()?;

        let now = self.clock.now();
        if claims.is_expired_at(now, self.leeway_seconds) {
            return Err(TokenError::TokenExpired);
        }

        Ok(claims)
    }
}

/// Checks the compact JWS shape before any cryptography runs
///
/// Truncated tokens and garbage payloads are reported as format errors
/// here instead of surfacing as signature failures later.
fn inspect_structure(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(TokenError::malformed(format!(
            "expected 3 dot-separated segments, found {}",
            segments.len()
        )));
    };

    let header = decode_json_object(header, "header")?;
    match header.get("alg").and_then(Value::as_str) {
        Some("ES256") => {}
        Some(other) => {
            return Err(TokenError::AlgorithmMismatch {
                found: other.to_string(),
            })
        }
        None => return Err(TokenError::malformed("header has no `alg`")),
    }

    decode_json_object(payload, "payload")?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|e| TokenError::malformed(format!("signature is not base64url: {}", e)))?;
    if signature.len() != ES256_SIGNATURE_LEN {
        return Err(TokenError::malformed(format!(
            "ES256 signature must be {} bytes, found {}",
            ES256_SIGNATURE_LEN,
            signature.len()
        )));
    }

    Ok(())
}

fn decode_json_object(segment: &str, part: &str) -> Result<Map<String, Value>, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::malformed(format!("{} is not base64url: {}", part, e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::malformed(format!("{} is not a JSON object: {}", part, e)))
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => TokenError::AlgorithmMismatch {
            found: "unsupported".to_string(),
        },
        ErrorKind::InvalidIssuer => TokenError::invalid_claims("unexpected issuer"),
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenError::malformed(format!("missing required claim `{}`", claim))
        }
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        _ => TokenError::malformed(error.to_string()),
    }
}
