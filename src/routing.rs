//! HTTP router
//!
//! Routes are registered with a chainable builder; `.middleware()` attaches
//! route-level middleware to the most recently registered route. The server
//! compiles the registered routes into a matchit-backed matcher once at
//! startup.

use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::http::{Request, Response};
use crate::middleware::{into_boxed, BoxedMiddleware, Middleware};

/// Type alias for route handlers
pub type BoxedHandler =
    Box<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

struct RouteDef {
    method: Method,
    path: String,
    handler: Arc<BoxedHandler>,
    middleware: Vec<BoxedMiddleware>,
}

/// Route registry built by the application's `routes::build_router()`
pub struct Router {
    routes: Vec<RouteDef>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    fn add<H, Fut>(mut self, method: Method, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let handler: BoxedHandler = Box::new(move |req| Box::pin(handler(req)));
        self.routes.push(RouteDef {
            method,
            path: path.to_string(),
            handler: Arc::new(handler),
            middleware: Vec::new(),
        });
        RouteBuilder { router: self }
    }

    /// Register a GET route
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add(Method::Get, path, handler)
    }

    /// Register a POST route
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add(Method::Post, path, handler)
    }

    /// Register a PUT route
    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add(Method::Put, path, handler)
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add(Method::Delete, path, handler)
    }

    /// Compile the registered routes into a matcher
    pub fn into_matcher(self) -> RouteMatcher {
        let mut matcher = RouteMatcher {
            get_routes: MatchitRouter::new(),
            post_routes: MatchitRouter::new(),
            put_routes: MatchitRouter::new(),
            delete_routes: MatchitRouter::new(),
        };

        for def in self.routes {
            let entry = Arc::new(RouteEntry {
                handler: def.handler,
                middleware: def.middleware,
            });
            let table = match def.method {
                Method::Get => &mut matcher.get_routes,
                Method::Post => &mut matcher.post_routes,
                Method::Put => &mut matcher.put_routes,
                Method::Delete => &mut matcher.delete_routes,
            };
            if let Err(err) = table.insert(&def.path, entry) {
                tracing::error!(path = %def.path, error = %err, "failed to register route");
            }
        }

        matcher
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// A matched route's handler plus its route-level middleware
pub struct RouteEntry {
    pub handler: Arc<BoxedHandler>,
    pub middleware: Vec<BoxedMiddleware>,
}

/// Compiled route tables, one per HTTP method
pub struct RouteMatcher {
    get_routes: MatchitRouter<Arc<RouteEntry>>,
    post_routes: MatchitRouter<Arc<RouteEntry>>,
    put_routes: MatchitRouter<Arc<RouteEntry>>,
    delete_routes: MatchitRouter<Arc<RouteEntry>>,
}

impl RouteMatcher {
    /// Match a request and return the route entry with extracted params
    pub fn match_route(
        &self,
        method: &hyper::Method,
        path: &str,
    ) -> Option<(Arc<RouteEntry>, HashMap<String, String>)> {
        let table = match *method {
            hyper::Method::GET => &self.get_routes,
            hyper::Method::POST => &self.post_routes,
            hyper::Method::PUT => &self.put_routes,
            hyper::Method::DELETE => &self.delete_routes,
            _ => return None,
        };

        table.at(path).ok().map(|matched| {
            let params: HashMap<String, String> = matched
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (matched.value.clone(), params)
        })
    }
}

/// Builder returned after registering a route, enabling chained registration
/// and `.middleware()` on the last route
pub struct RouteBuilder {
    router: Router,
}

impl RouteBuilder {
    /// Apply middleware to the most recently registered route
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> RouteBuilder {
        if let Some(last) = self.router.routes.last_mut() {
            last.middleware.push(into_boxed(middleware));
        }
        self
    }

    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.get(path, handler)
    }

    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.post(path, handler)
    }

    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.put(path, handler)
    }

    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.delete(path, handler)
    }
}

impl From<RouteBuilder> for Router {
    fn from(builder: RouteBuilder) -> Self {
        builder.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;

    async fn handler(_req: Request) -> Response {
        HttpResponse::text("ok").ok()
    }

    #[test]
    fn matches_registered_routes_with_params() {
        let router: Router = Router::new()
            .get("/todos", handler)
            .post("/todos/{id}/toggle", handler)
            .into();
        let matcher = router.into_matcher();

        assert!(matcher.match_route(&hyper::Method::GET, "/todos").is_some());
        let (_, params) = matcher
            .match_route(&hyper::Method::POST, "/todos/abc/toggle")
            .expect("parameterized route matches");
        assert_eq!(params.get("id").map(String::as_str), Some("abc"));
        assert!(matcher.match_route(&hyper::Method::DELETE, "/todos").is_none());
    }

    #[test]
    fn conflicting_registration_keeps_the_first_route() {
        let router: Router = Router::new()
            .get("/dup", handler)
            .get("/dup", handler)
            .into();
        let matcher = router.into_matcher();

        assert!(matcher.match_route(&hyper::Method::GET, "/dup").is_some());
    }
}
