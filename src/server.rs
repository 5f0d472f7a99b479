//! HTTP server
//!
//! One tokio task per connection; each request runs the global middleware,
//! then any route-level middleware, then the handler.

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::{HttpResponse, Request};
use crate::middleware::{global_middleware, BoxedMiddleware, Middleware, MiddlewareChain};
use crate::routing::{RouteMatcher, Router};

pub struct Server {
    matcher: Arc<RouteMatcher>,
    middleware: Vec<BoxedMiddleware>,
    host: String,
    port: u16,
}

impl Server {
    pub fn new(router: impl Into<Router>) -> Self {
        Self {
            matcher: Arc::new(router.into().into_matcher()),
            middleware: Vec::new(),
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }

    /// Build a server from `ServerConfig` and the globally registered
    /// middleware
    pub fn from_config(router: impl Into<Router>) -> Self {
        let config = ServerConfig::from_env();
        Self {
            matcher: Arc::new(router.into().into_matcher()),
            middleware: global_middleware(),
            host: config.host,
            port: config.port,
        }
    }

    /// Add global middleware (runs on every request)
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::new(self.host.parse()?, self.port);
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("taskdeck server running on http://{}", addr);

        let matcher = self.matcher;
        let middleware = Arc::new(self.middleware);

        loop {
            let (stream, _) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let matcher = matcher.clone();
            let middleware = middleware.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let matcher = matcher.clone();
                    let middleware = middleware.clone();
                    async move { Ok::<_, Infallible>(handle_request(matcher, middleware, req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::error!(error = %err, "error serving connection");
                }
            });
        }
    }
}

async fn handle_request(
    matcher: Arc<RouteMatcher>,
    global: Arc<Vec<BoxedMiddleware>>,
    req: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match matcher.match_route(&method, &path) {
        Some((entry, params)) => {
            let request = Request::new(req).with_params(params);

            let mut chain = MiddlewareChain::new();
            chain.extend(global.iter().cloned());
            chain.extend(entry.middleware.iter().cloned());

            let response = chain.execute(request, entry.handler.clone()).await;

            // Both Ok and Err carry a response
            response.unwrap_or_else(|e| e).into_hyper()
        }
        None => HttpResponse::json(serde_json::json!({ "error": "Not found" }))
            .status(404)
            .into_hyper(),
    }
}
