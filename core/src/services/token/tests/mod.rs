//! Tests for the token module

mod verifier_tests;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::identity::Identity;
use crate::services::token::{Es256KeyManager, ManualClock, TokenManager, TokenManagerConfig};

pub(super) const PRIVATE_KEY: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/keys/es256_private.pem"));
pub(super) const PUBLIC_KEY: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/keys/es256_public.pem"));
pub(super) const ALT_PRIVATE_KEY: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/keys/es256_alt_private.pem"));
pub(super) const ALT_PUBLIC_KEY: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/keys/es256_alt_public.pem"));

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

pub(super) fn test_keys() -> Es256KeyManager {
    Es256KeyManager::from_pem(PRIVATE_KEY, PUBLIC_KEY).expect("test key pair should load")
}

/// Manager on the primary key pair with a clock frozen at `fixed_now()`
pub(super) fn manager_with_clock(config: TokenManagerConfig) -> (TokenManager, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let manager = TokenManager::with_clock(test_keys(), config, clock.clone());
    (manager, clock)
}

pub(super) fn customer() -> Identity {
    Identity::new("u-1", "a@x.com", false)
}

pub(super) fn courier() -> Identity {
    Identity::new("u-2", "b@x.com", true)
}
