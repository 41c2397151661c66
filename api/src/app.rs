//! Application factory
//!
//! Builds the actix-web application around a `TokenVerifier`. The server
//! binary and the integration tests share this factory.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, Error, HttpResponse};
use us_core::TokenVerifier;

use crate::error::ApiError;
use crate::middleware::{JwtAuth, RequestId, RequestLogger};
use crate::routes::{auth, health};

/// Create and configure the application
pub fn create_app(
    verifier: TokenVerifier,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestLogger)
        // Outermost, so the ID exists before the logger reads it
        .wrap(RequestId)
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .wrap(JwtAuth::new(verifier))
                    .route("/me", web::get().to(auth::me)),
            ),
        )
        .default_service(web::to(not_found))
}

async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}
