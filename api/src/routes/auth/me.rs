use actix_web::HttpResponse;

use crate::middleware::AuthContext;

/// Returns the identity carried by the caller's access token
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(auth)
}
