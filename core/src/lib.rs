//! # User Service Core
//!
//! Token-based authentication core for the user service: the identity
//! and claim model, ES256 key material, and the token manager that issues
//! and verifies access and refresh tokens.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
