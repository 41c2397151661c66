//! HTTP error mapping
//!
//! Every failure leaving the API is rendered as a `us_shared::ErrorResponse`.
//! Verification details stay in the logs; clients only see the stable code.

use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use us_core::TokenError;
use us_shared::{error_codes, ErrorResponse};

/// Challenge sent when the bearer token was valid but has expired
pub const EXPIRED_TOKEN_CHALLENGE: &str =
    r#"Bearer error="invalid_token", error_description="token expired""#;

const INVALID_TOKEN_CHALLENGE: &str = r#"Bearer error="invalid_token""#;
const MISSING_TOKEN_CHALLENGE: &str = "Bearer";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing or malformed Authorization header")]
    MissingCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Resource not found")]
    NotFound,
}

impl ApiError {
    /// Stable code carried in the response body
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredentials => error_codes::UNAUTHORIZED,
            Self::Token(err) => err.error_code(),
            Self::NotFound => error_codes::NOT_FOUND,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "Authentication required",
            Self::Token(err) if err.is_expired() => "Access token has expired",
            Self::Token(err) if err.is_client_error() => "Access token is invalid",
            Self::Token(_) => "An internal error occurred",
            Self::NotFound => "The requested resource was not found",
        }
    }

    fn challenge(&self) -> Option<&'static str> {
        match self {
            Self::MissingCredentials => Some(MISSING_TOKEN_CHALLENGE),
            Self::Token(err) if err.is_expired() => Some(EXPIRED_TOKEN_CHALLENGE),
            Self::Token(err) if err.is_client_error() => Some(INVALID_TOKEN_CHALLENGE),
            _ => None,
        }
    }

    /// Renders the error, tagging the body with the request ID when one is known
    pub fn to_response(&self, request_id: Option<&str>) -> HttpResponse {
        let mut body = ErrorResponse::new(self.error_code(), self.public_message());
        if let Some(request_id) = request_id {
            body = body.with_request_id(request_id);
        }

        let mut response = HttpResponse::build(self.status_code());
        if let Some(challenge) = self.challenge() {
            response.insert_header((header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge)));
        }
        response.json(body)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredentials => StatusCode::UNAUTHORIZED,
            Self::Token(err) if err.is_client_error() => StatusCode::UNAUTHORIZED,
            Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.to_response(None)
    }
}
