//! ES256 key management for JWT signing and verification

use std::fs;
use std::path::{Path, PathBuf};

use jsonwebtoken::{crypto, Algorithm, DecodingKey, EncodingKey};
use tracing::debug;
use us_shared::JwtConfig;

use crate::errors::TokenError;

/// Signing algorithm shared by access and refresh tokens
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::ES256;

const PAIR_CHECK_MESSAGE: &[u8] = b"es256-key-pair-check";

/// Manager for the ES256 key pair used in JWT operations
///
/// Holds the PKCS#8 private key for signing and the matching public key
/// for verification. Both halves are checked when the manager is built.
#[derive(Clone)]
pub struct Es256KeyManager {
    /// Private key for signing JWTs
    encoding_key: EncodingKey,
    /// Public key for verifying JWTs
    decoding_key: DecodingKey,
    /// Where the keys came from, for diagnostics only
    source: KeySource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeySource {
    Files {
        private_key_path: PathBuf,
        public_key_path: PathBuf,
    },
    Memory,
}

impl std::fmt::Debug for Es256KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Es256KeyManager")
            .field("algorithm", &TOKEN_ALGORITHM)
            .field("source", &self.source)
            .finish()
    }
}

impl Es256KeyManager {
    /// Creates a key manager from PEM strings
    ///
    /// # Arguments
    ///
    /// * `private_key_pem` - PEM-encoded PKCS#8 EC P-256 private key
    /// * `public_key_pem` - PEM-encoded EC P-256 public key
    ///
    /// # Returns
    ///
    /// * `Ok(Es256KeyManager)` - Keys parsed and proven to form a pair
    /// * `Err(TokenError::Configuration)` - Malformed key or mismatched halves
    pub fn from_pem(private_key_pem: &str, public_key_pem: &str) -> Result<Self, TokenError> {
        Self::build(
            private_key_pem.as_bytes(),
            public_key_pem.as_bytes(),
            KeySource::Memory,
        )
    }

    /// Creates a key manager from PEM key files
    ///
    /// # Arguments
    ///
    /// * `private_key_path` - Path to the PEM-encoded private key file
    /// * `public_key_path` - Path to the PEM-encoded public key file
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        private_key_path: P,
        public_key_path: Q,
    ) -> Result<Self, TokenError> {
        let private_key_path = private_key_path.as_ref().to_path_buf();
        let public_key_path = public_key_path.as_ref().to_path_buf();

        let private_key_pem = fs::read(&private_key_path).map_err(|e| {
            TokenError::configuration(format!(
                "failed to read private key {}: {}",
                private_key_path.display(),
                e
            ))
        })?;
        let public_key_pem = fs::read(&public_key_path).map_err(|e| {
            TokenError::configuration(format!(
                "failed to read public key {}: {}",
                public_key_path.display(),
                e
            ))
        })?;

        let manager = Self::build(
            &private_key_pem,
            &public_key_pem,
            KeySource::Files {
                private_key_path,
                public_key_path,
            },
        )?;

        debug!(source = ?manager.source, "loaded ES256 key pair");
        Ok(manager)
    }

    /// Creates a key manager from the key paths in the application configuration
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, TokenError> {
        Self::from_files(&config.private_key_path, &config.public_key_path)
    }

    /// Parses a public key on its own, for services that only verify tokens
    pub fn verifier_key(public_key_pem: &str) -> Result<DecodingKey, TokenError> {
        DecodingKey::from_ec_pem(public_key_pem.as_bytes())
            .map_err(|e| TokenError::configuration(format!("invalid public key: {}", e)))
    }

    fn build(private_key_pem: &[u8], public_key_pem: &[u8], source: KeySource) -> Result<Self, TokenError> {
        let encoding_key = EncodingKey::from_ec_pem(private_key_pem)
            .map_err(|e| TokenError::configuration(format!("invalid private key: {}", e)))?;
        let decoding_key = DecodingKey::from_ec_pem(public_key_pem)
            .map_err(|e| TokenError::configuration(format!("invalid public key: {}", e)))?;

        // PEM parsing accepts SEC1 keys and unrelated halves; a test signature does not.
        let signature = crypto::sign(PAIR_CHECK_MESSAGE, &encoding_key, TOKEN_ALGORITHM)
            .map_err(|e| TokenError::configuration(format!("private key cannot sign: {}", e)))?;
        let matches = crypto::verify(&signature, PAIR_CHECK_MESSAGE, &decoding_key, TOKEN_ALGORITHM)
            .map_err(|e| TokenError::configuration(format!("public key cannot verify: {}", e)))?;
        if !matches {
            return Err(TokenError::configuration(
                "private and public keys do not form a pair",
            ));
        }

        Ok(Self {
            encoding_key,
            decoding_key,
            source,
        })
    }

    /// Returns the encoding key for signing JWTs
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Returns the decoding key for verifying JWTs
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Returns the paths to the key files, if the keys were loaded from disk
    pub fn key_paths(&self) -> Option<(&Path, &Path)> {
        match &self.source {
            KeySource::Files {
                private_key_path,
                public_key_path,
            } => Some((private_key_path, public_key_path)),
            KeySource::Memory => None,
        }
    }
}
