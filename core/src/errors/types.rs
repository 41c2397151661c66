//! Token error taxonomy
//!
//! Construction-time failures (`Configuration`) are fatal to startup,
//! issuance-time failures (`TokenGenerationFailed`) are operational faults,
//! and every verification-time variant is recoverable by the caller, which
//! decides the user-visible response.

use thiserror::Error;
use us_shared::error_codes;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Key material or lifetimes unusable; raised while building the manager
    #[error("Invalid token configuration: {message}")]
    Configuration { message: String },

    /// The signing operation could not complete
    #[error("Token generation failed: {message}")]
    TokenGenerationFailed { message: String },

    /// Not a structurally valid ES256 compact token, or its claims do not decode
    #[error("Invalid token format: {message}")]
    InvalidTokenFormat { message: String },

    #[error("Invalid signature")]
    InvalidSignature,

    /// Header names an algorithm other than the configured one
    #[error("Unexpected token algorithm: {found}")]
    AlgorithmMismatch { found: String },

    /// Signature verified but the claims violate issuance rules
    #[error("Invalid claims: {message}")]
    InvalidClaims { message: String },

    /// Signature verified but the token is past `exp`
    #[error("Token expired")]
    TokenExpired,
}

impl TokenError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::InvalidTokenFormat {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_claims(message: impl Into<String>) -> Self {
        Self::InvalidClaims {
            message: message.into(),
        }
    }

    /// Expired tokens should be answered with "refresh and retry"
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::TokenExpired)
    }

    /// Whether the failure comes from the presented token rather than from this service
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::Configuration { .. } | Self::TokenGenerationFailed { .. }
        )
    }

    /// Stable code used in error response bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenExpired => error_codes::TOKEN_EXPIRED,
            Self::Configuration { .. } | Self::TokenGenerationFailed { .. } => {
                error_codes::INTERNAL_ERROR
            }
            _ => error_codes::TOKEN_INVALID,
        }
    }
}
