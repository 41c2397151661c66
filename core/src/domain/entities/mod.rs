//! Domain entities representing core business objects.

pub mod identity;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use identity::{Identity, Role};
pub use token::{AccessTokenClaims, RefreshTokenClaims, TokenPair, TokenUse, TOKEN_TYPE_BEARER};
