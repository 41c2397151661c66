//! One structured log event per request

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::USER_AGENT;
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::request_id::RequestIdValue;

pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let summary = RequestSummary::from_request(&req);

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, error) = match &result {
                Ok(res) => (res.status().as_u16(), None),
                Err(err) => (err.as_response_error().status_code().as_u16(), Some(err)),
            };
            summary.log(status, start.elapsed().as_millis() as u64, error);

            result
        })
    }
}

/// Request fields captured before the inner service consumes the request
struct RequestSummary {
    request_id: String,
    method: String,
    path: String,
    remote_ip: String,
    user_agent: String,
}

impl RequestSummary {
    fn from_request(req: &ServiceRequest) -> Self {
        let remote_ip = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        let request_id = req
            .extensions()
            .get::<RequestIdValue>()
            .map(|id| id.as_str().to_owned())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            request_id,
            method: req.method().to_string(),
            path: req.path().to_string(),
            remote_ip,
            user_agent,
        }
    }

    fn log(&self, status: u16, latency_ms: u64, error: Option<&Error>) {
        let Self {
            request_id,
            method,
            path,
            remote_ip,
            user_agent,
        } = self;

        if let Some(err) = error {
            error!(%request_id, %method, %path, status, %remote_ip, %user_agent, latency_ms, error = %err, "request failed");
        } else if status >= 500 {
            error!(%request_id, %method, %path, status, %remote_ip, %user_agent, latency_ms, "request failed");
        } else if status >= 400 {
            warn!(%request_id, %method, %path, status, %remote_ip, %user_agent, latency_ms, "request rejected");
        } else {
            info!(%request_id, %method, %path, status, %remote_ip, %user_agent, latency_ms, "request completed");
        }
    }
}
