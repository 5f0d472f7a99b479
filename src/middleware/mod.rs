//! Middleware
//!
//! Global middleware runs on every request in registration order, before any
//! route-level middleware. Register global middleware in
//! `bootstrap::register()`.

mod auth;
mod logging;

pub use auth::AuthMiddleware;
pub use logging::RequestLogMiddleware;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock, RwLock};

use crate::http::{Request, Response};
use crate::routing::BoxedHandler;

/// Continuation passed to middleware: call it to run the rest of the chain
pub type Next =
    Box<dyn FnOnce(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send>;

#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: Request, next: Next) -> Response;
}

pub type BoxedMiddleware = Arc<dyn Middleware>;

pub fn into_boxed<M: Middleware + 'static>(middleware: M) -> BoxedMiddleware {
    Arc::new(middleware)
}

/// Global middleware registry (populated from bootstrap)
static GLOBAL_MIDDLEWARE: OnceLock<RwLock<Vec<BoxedMiddleware>>> = OnceLock::new();

/// Register a global middleware that runs on every request
pub fn register_global_middleware<M: Middleware + 'static>(middleware: M) {
    let registry = GLOBAL_MIDDLEWARE.get_or_init(|| RwLock::new(Vec::new()));
    if let Ok(mut vec) = registry.write() {
        vec.push(into_boxed(middleware));
    }
}

/// Get all registered global middleware
pub fn global_middleware() -> Vec<BoxedMiddleware> {
    GLOBAL_MIDDLEWARE
        .get()
        .and_then(|lock| lock.read().ok())
        .map(|vec| vec.clone())
        .unwrap_or_default()
}

/// An ordered middleware chain executed around a handler
pub struct MiddlewareChain {
    middleware: VecDeque<BoxedMiddleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middleware: VecDeque::new(),
        }
    }

    pub fn extend(&mut self, middleware: impl IntoIterator<Item = BoxedMiddleware>) {
        self.middleware.extend(middleware);
    }

    /// Run the chain, innermost call being the route handler
    pub async fn execute(self, request: Request, handler: Arc<BoxedHandler>) -> Response {
        run_chain(self.middleware, handler, request).await
    }
}

impl Default for MiddlewareChain {
    fn default() -> Self {
        Self::new()
    }
}

fn run_chain(
    mut stack: VecDeque<BoxedMiddleware>,
    handler: Arc<BoxedHandler>,
    request: Request,
) -> Pin<Box<dyn Future<Output = Response> + Send>> {
    match stack.pop_front() {
        Some(current) => Box::pin(async move {
            let next: Next = Box::new(move |req| run_chain(stack, handler, req));
            current.handle(request, next).await
        }),
        None => Box::pin(async move { handler(request).await }),
    }
}
