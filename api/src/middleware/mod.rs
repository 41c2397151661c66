pub mod auth;
pub mod request_id;
pub mod request_logger;

pub use auth::{AuthContext, JwtAuth};
pub use request_id::{RequestId, RequestIdValue, REQUEST_ID_HEADER};
pub use request_logger::RequestLogger;
