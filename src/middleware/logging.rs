//! Request logging middleware

use async_trait::async_trait;
use std::time::Instant;

use super::{Middleware, Next};
use crate::http::{Request, Response};

/// Logs one line per request with method, path, status, and latency
pub struct RequestLogMiddleware;

#[async_trait]
impl Middleware for RequestLogMiddleware {
    async fn handle(&self, request: Request, next: Next) -> Response {
        let method = request.method().clone();
        let path = request.path().to_string();
        let start = Instant::now();

        let response = next(request).await;

        let status = match &response {
            Ok(r) => r.status_code(),
            Err(r) => r.status_code(),
        };
        tracing::info!(
            %method,
            path,
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "request"
        );

        response
    }
}
