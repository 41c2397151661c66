//! Tests for token verification failure modes

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use super::{customer, fixed_now, manager_with_clock, ALT_PRIVATE_KEY, ALT_PUBLIC_KEY, PRIVATE_KEY};
use crate::errors::TokenError;
use crate::services::token::{Es256KeyManager, TokenManager, TokenManagerConfig};

fn default_manager() -> TokenManager {
    manager_with_clock(TokenManagerConfig::default()).0
}

/// Signs arbitrary claims with the primary private key
fn sign_raw(claims: &serde_json::Value) -> String {
    let key = EncodingKey::from_ec_pem(PRIVATE_KEY.as_bytes()).unwrap();
    encode(&Header::new(Algorithm::ES256), claims, &key).unwrap()
}

fn access_claims_json() -> serde_json::Value {
    let iat = fixed_now().timestamp();
    json!({
        "sub": "u-1",
        "email": "a@x.com",
        "role": "user",
        "is_courier": false,
        "token_use": "access",
        "iss": "user-service",
        "jti": "5f0c2a4e-8d7b-4c3e-9f41-6a2b1d0e9c87",
        "iat": iat,
        "exp": iat + 3600,
    })
}

fn replace_segment(token: &str, index: usize, segment: &str) -> String {
    let mut parts: Vec<&str> = token.split('.').collect();
    parts[index] = segment;
    parts.join(".")
}

#[test]
fn test_hand_built_claims_verify() {
    let manager = default_manager();
    let claims = manager.verify_access_token(&sign_raw(&access_claims_json())).unwrap();
    assert_eq!(claims.subject_id, "u-1");
}

#[test]
fn test_signature_from_other_key_rejected() {
    let manager = default_manager();
    let other = TokenManager::new(
        Es256KeyManager::from_pem(ALT_PRIVATE_KEY, ALT_PUBLIC_KEY).unwrap(),
        TokenManagerConfig::default(),
    );

    let token = other.issue_access_token(&customer()).unwrap();

    assert_eq!(manager.verify_access_token(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_tampered_payload_rejected() {
    let manager = default_manager();
    let token = manager.issue_access_token(&customer()).unwrap();

    let mut forged = access_claims_json();
    forged["role"] = json!("courier");
    forged["is_courier"] = json!(true);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());

    assert_eq!(
        manager.verify_access_token(&replace_segment(&token, 1, &payload)),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_truncated_token_is_format_error() {
    let manager = default_manager();
    let token = manager.issue_access_token(&customer()).unwrap();

    for cut in [1, 5, 20] {
        let truncated = &token[..token.len() - cut];
        assert!(
            matches!(
                manager.verify_access_token(truncated),
                Err(TokenError::InvalidTokenFormat { .. })
            ),
            "truncating {} chars should be a format error",
            cut
        );
    }

    let without_signature = &token[..token.rfind('.').unwrap()];
    assert!(matches!(
        manager.verify_access_token(without_signature),
        Err(TokenError::InvalidTokenFormat { .. })
    ));
}

#[test]
fn test_garbage_is_format_error() {
    let manager = default_manager();
    let token = manager.issue_access_token(&customer()).unwrap();
    let not_json = URL_SAFE_NO_PAD.encode(b"not-json");

    for input in [
        String::new(),
        "garbage".to_string(),
        "a.b.c".to_string(),
        replace_segment(&token, 1, &not_json),
        replace_segment(&token, 1, "!!!"),
        replace_segment(&token, 0, &not_json),
    ] {
        assert!(
            matches!(
                manager.verify_access_token(&input),
                Err(TokenError::InvalidTokenFormat { .. })
            ),
            "{:?} should be a format error",
            input
        );
    }
}

#[test]
fn test_symmetric_algorithm_rejected() {
    let manager = default_manager();
    let token = encode(
        &Header::new(Algorithm::HS256),
        &access_claims_json(),
        &EncodingKey::from_secret(b"guessable-secret"),
    )
    .unwrap();

    assert_eq!(
        manager.verify_access_token(&token),
        Err(TokenError::AlgorithmMismatch {
            found: "HS256".to_string()
        })
    );
}

#[test]
fn test_unsigned_token_rejected() {
    let manager = default_manager();
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&access_claims_json()).unwrap());

    assert_eq!(
        manager.verify_access_token(&format!("{}.{}.", header, payload)),
        Err(TokenError::AlgorithmMismatch {
            found: "none".to_string()
        })
    );
}

#[test]
fn test_refresh_token_rejected_as_access_token() {
    let manager = default_manager();
    let refresh = manager.issue_refresh_token(&customer()).unwrap();

    let err = manager.verify_access_token(&refresh).unwrap_err();
    assert!(matches!(err, TokenError::InvalidTokenFormat { .. }), "got {:?}", err);
}

#[test]
fn test_access_token_rejected_as_refresh_token() {
    let manager = default_manager();
    let access = manager.issue_access_token(&customer()).unwrap();

    let err = manager.verify_refresh_token(&access).unwrap_err();
    assert!(matches!(err, TokenError::InvalidClaims { .. }), "got {:?}", err);
}

#[test]
fn test_access_shaped_token_marked_refresh_rejected() {
    let manager = default_manager();
    let mut claims = access_claims_json();
    claims["token_use"] = json!("refresh");

    let err = manager.verify_access_token(&sign_raw(&claims)).unwrap_err();
    assert!(matches!(err, TokenError::InvalidClaims { .. }), "got {:?}", err);
}

#[test]
fn test_foreign_issuer_rejected() {
    let manager = default_manager();
    let foreign = manager_with_clock(TokenManagerConfig::default().with_issuer("other-service").unwrap()).0;

    let token = foreign.issue_access_token(&customer()).unwrap();

    let err = manager.verify_access_token(&token).unwrap_err();
    assert!(matches!(err, TokenError::InvalidClaims { .. }), "got {:?}", err);
}

#[test]
fn test_inconsistent_role_rejected() {
    let manager = default_manager();
    let mut claims = access_claims_json();
    claims["role"] = json!("courier");

    let err = manager.verify_access_token(&sign_raw(&claims)).unwrap_err();
    assert!(matches!(err, TokenError::InvalidClaims { .. }), "got {:?}", err);
}

#[test]
fn test_unknown_role_is_format_error() {
    let manager = default_manager();
    let mut claims = access_claims_json();
    claims["role"] = json!("admin");

    let err = manager.verify_access_token(&sign_raw(&claims)).unwrap_err();
    assert!(matches!(err, TokenError::InvalidTokenFormat { .. }), "got {:?}", err);
}

#[test]
fn test_missing_expiry_is_format_error() {
    let manager = default_manager();
    let mut claims = access_claims_json();
    claims.as_object_mut().unwrap().remove("exp");

    let err = manager.verify_access_token(&sign_raw(&claims)).unwrap_err();
    assert!(matches!(err, TokenError::InvalidTokenFormat { .. }), "got {:?}", err);
}

#[test]
fn test_expiry_checked_after_signature() {
    let (manager, clock) = manager_with_clock(TokenManagerConfig::default());
    let other = TokenManager::new(
        Es256KeyManager::from_pem(ALT_PRIVATE_KEY, ALT_PUBLIC_KEY).unwrap(),
        TokenManagerConfig::default(),
    );
    let forged = other.issue_access_token(&customer()).unwrap();

    clock.advance(Duration::days(30));

    assert_eq!(manager.verify_access_token(&forged), Err(TokenError::InvalidSignature));
}

#[test]
fn test_error_codes_for_verification_failures() {
    let (manager, clock) = manager_with_clock(TokenManagerConfig::default());
    let token = manager.issue_access_token(&customer()).unwrap();

    assert_eq!(
        manager.verify_access_token("garbage").unwrap_err().error_code(),
        us_shared::error_codes::TOKEN_INVALID
    );

    clock.advance(Duration::hours(1));
    let expired = manager.verify_access_token(&token).unwrap_err();
    assert!(expired.is_client_error());
    assert_eq!(expired.error_code(), us_shared::error_codes::TOKEN_EXPIRED);
}
