//! Bearer-token authentication for protected routes.
//!
//! Extracts the access token from the Authorization header, verifies it
//! with the shared `TokenVerifier` and injects the caller's `AuthContext`
//! into request extensions. Rejections are answered here so that outer
//! middleware still sees a response carrying the request ID.

use std::future::{ready, Ready};

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use tracing::debug;
use us_core::{AccessTokenClaims, Role, TokenVerifier};

use super::request_id::RequestIdValue;
use crate::error::ApiError;

/// Authenticated caller, taken from verified access token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub is_courier: bool,
    /// JWT ID of the presented token
    pub token_id: String,
    /// Expiry of the presented token, seconds since the Unix epoch
    pub expires_at: i64,
}

impl From<AccessTokenClaims> for AuthContext {
    fn from(claims: AccessTokenClaims) -> Self {
        Self {
            user_id: claims.subject_id,
            email: claims.email,
            role: claims.role,
            is_courier: claims.is_courier,
            token_id: claims.token_id,
            expires_at: claims.expires_at,
        }
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    verifier: TokenVerifier,
}

impl JwtAuth {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service,
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: S,
    verifier: TokenVerifier,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let outcome = match extract_bearer_token(&req) {
            Some(token) => self.verifier.verify_access_token(token).map_err(ApiError::from),
            None => Err(ApiError::MissingCredentials),
        };

        match outcome {
            Ok(claims) => {
                req.extensions_mut().insert(AuthContext::from(claims));
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(error) => {
                let request_id = req
                    .extensions()
                    .get::<RequestIdValue>()
                    .map(|id| id.as_str().to_owned());
                debug!(request_id = ?request_id, error = %error, "rejected bearer authentication");

                let response = error.to_response(request_id.as_deref());
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

/// Extracts the token from `Authorization: Bearer <token>`; the scheme is case-insensitive
fn extract_bearer_token(req: &ServiceRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Extractor for handlers behind `JwtAuth`
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::MissingCredentials.into());

        ready(result)
    }
}
