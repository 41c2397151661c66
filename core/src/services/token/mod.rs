//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - ES256 key management for asymmetric signing
//! - Access and refresh token issuance
//! - Stateless verification against the public key
//! - Injectable time source for expiry checks

mod clock;
mod config;
mod key_manager;
mod manager;
mod verifier;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TokenManagerConfig;
pub use key_manager::Es256KeyManager;
pub use manager::TokenManager;
pub use verifier::TokenVerifier;
