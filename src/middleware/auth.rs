//! Session-cookie gate for protected route groups
//!
//! Only verifies that a session token is present on the request; the full
//! session lookup and role check happen in the controller. This mirrors the
//! split between the routing layer and the page-level auth check.

use async_trait::async_trait;

use super::{Middleware, Next};
use crate::auth::SESSION_COOKIE;
use crate::error::Error;
use crate::http::{Request, Response};

pub struct AuthMiddleware;

#[async_trait]
impl Middleware for AuthMiddleware {
    async fn handle(&self, request: Request, next: Next) -> Response {
        let has_token = request.cookie(SESSION_COOKIE).is_some()
            || request
                .header("authorization")
                .map(|v| v.starts_with("Bearer "))
                .unwrap_or(false);

        if !has_token {
            return Err(Error::Unauthenticated.into());
        }

        next(request).await
    }
}
