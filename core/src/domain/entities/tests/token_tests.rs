//! Unit tests for token claim entities

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::identity::{Identity, Role};
use crate::domain::entities::token::{
    AccessTokenClaims, RefreshTokenClaims, TokenPair, TokenUse, TOKEN_TYPE_BEARER,
};

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_access_claims_from_identity() {
    let identity = Identity::new("u-1", "a@x.com", false);
    let claims = AccessTokenClaims::new(&identity, "user-service", fixed_now(), Duration::hours(1)).unwrap();

    assert_eq!(claims.subject_id, "u-1");
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.role, Role::User);
    assert!(!claims.is_courier);
    assert_eq!(claims.token_use, TokenUse::Access);
    assert_eq!(claims.issuer, "user-service");
    assert!(!claims.token_id.is_empty());
    assert_eq!(claims.issued_at(), Some(fixed_now()));
    assert_eq!(claims.lifetime(), Duration::seconds(3600));
    assert!(claims.role_is_consistent());
}

#[test]
fn test_access_claims_courier() {
    let identity = Identity::new("u-2", "b@x.com", true);
    let claims = AccessTokenClaims::new(&identity, "user-service", fixed_now(), Duration::hours(1)).unwrap();

    assert_eq!(claims.role, Role::Courier);
    assert!(claims.is_courier);
}

#[test]
fn test_access_claims_wire_names() {
    let identity = Identity::new("u-2", "b@x.com", true);
    let claims = AccessTokenClaims::new(&identity, "user-service", fixed_now(), Duration::minutes(15)).unwrap();
    let json = serde_json::to_value(&claims).unwrap();

    assert_eq!(json["sub"], "u-2");
    assert_eq!(json["role"], "courier");
    assert_eq!(json["is_courier"], true);
    assert_eq!(json["token_use"], "access");
    assert_eq!(json["iss"], "user-service");
    assert_eq!(json["iat"], fixed_now().timestamp());
    assert_eq!(json["exp"], fixed_now().timestamp() + 900);
}

#[test]
fn test_access_claims_expiry_boundary() {
    let identity = Identity::new("u-1", "a@x.com", false);
    let claims = AccessTokenClaims::new(&identity, "user-service", fixed_now(), Duration::hours(1)).unwrap();

    assert!(!claims.is_expired_at(fixed_now(), 0));
    assert!(!claims.is_expired_at(fixed_now() + Duration::seconds(3599), 0));
    assert!(claims.is_expired_at(fixed_now() + Duration::seconds(3600), 0));
    assert!(!claims.is_expired_at(fixed_now() + Duration::seconds(3600), 30));
}

#[test]
fn test_inconsistent_role_detected() {
    let identity = Identity::new("u-1", "a@x.com", false);
    let mut claims = AccessTokenClaims::new(&identity, "user-service", fixed_now(), Duration::hours(1)).unwrap();
    claims.role = Role::Courier;

    assert!(!claims.role_is_consistent());
}

#[test]
fn test_refresh_claims_carry_no_role() {
    let identity = Identity::new("u-2", "b@x.com", true);
    let claims = RefreshTokenClaims::new(&identity, "user-service", fixed_now(), Duration::hours(24)).unwrap();
    let json = serde_json::to_value(&claims).unwrap();

    assert_eq!(claims.token_use, TokenUse::Refresh);
    assert_eq!(claims.lifetime(), Duration::hours(24));
    assert!(json.get("role").is_none());
    assert!(json.get("is_courier").is_none());
}

#[test]
fn test_refresh_claims_do_not_deserialize_as_access() {
    let identity = Identity::new("u-1", "a@x.com", false);
    let refresh = RefreshTokenClaims::new(&identity, "user-service", fixed_now(), Duration::hours(24)).unwrap();
    let json = serde_json::to_string(&refresh).unwrap();

    assert!(serde_json::from_str::<AccessTokenClaims>(&json).is_err());
}

#[test]
fn test_token_ids_are_unique() {
    let identity = Identity::new("u-1", "a@x.com", false);
    let first = AccessTokenClaims::new(&identity, "user-service", fixed_now(), Duration::hours(1)).unwrap();
    let second = AccessTokenClaims::new(&identity, "user-service", fixed_now(), Duration::hours(1)).unwrap();

    assert_ne!(first.token_id, second.token_id);
}

#[test]
fn test_token_pair() {
    let pair = TokenPair::new("access".to_string(), "refresh".to_string(), 3600);

    assert_eq!(pair.token_type, TOKEN_TYPE_BEARER);
    assert_eq!(pair.expires_in, 3600);
}

#[test]
fn test_claims_reject_unrepresentable_expiry() {
    let identity = Identity::new("u-1", "a@x.com", false);
    let near_end = chrono::DateTime::<Utc>::MAX_UTC - Duration::minutes(30);

    assert!(AccessTokenClaims::new(&identity, "user-service", near_end, Duration::hours(1)).is_none());
    assert!(RefreshTokenClaims::new(&identity, "user-service", near_end, Duration::hours(24)).is_none());
    assert!(AccessTokenClaims::new(&identity, "user-service", near_end, Duration::minutes(10)).is_some());
}
