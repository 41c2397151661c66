//! Domain layer containing the identity and token claim types.

pub mod entities;

// Re-export commonly used domain types
pub use entities::{
    AccessTokenClaims, Identity, RefreshTokenClaims, Role, TokenPair, TokenUse, TOKEN_TYPE_BEARER,
};
