//! # User Service API
//!
//! actix-web transport around the token core: bearer authentication,
//! request correlation and structured request logging.

pub mod app;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use error::ApiError;
